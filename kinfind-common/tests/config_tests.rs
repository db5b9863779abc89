//! Unit tests for configuration and graceful degradation
//!
//! Tests cover:
//! - Missing TOML file falls back to defaults
//! - Partial TOML files keep defaults for omitted fields
//! - Root folder priority order (CLI > env > TOML > default)
//!
//! Tests that manipulate KINFIND_ROOT_FOLDER are marked with #[serial]
//! so they never run in parallel.

use kinfind_common::config::{
    default_root_folder, RootFolderInitializer, RootFolderResolver, TomlConfig, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = TomlConfig::default();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5000);
    assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(config.verifier.model_name, "VGG-Face");
    assert_eq!(config.verifier.detector_backend, "opencv");
    assert!(config.verifier.enforce_detection);
    assert_eq!(config.logging.level, "info");
    assert!(config.root_folder.is_none());
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = TomlConfig::load_or_default(&path).expect("missing file must not be fatal");
    assert_eq!(config.port, 5000);
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = TomlConfig::from_toml_str(
        r#"
        port = 8080
        root_folder = "/srv/kinfind"

        [verifier]
        url = "http://faces.internal:5005"
        "#,
    )
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/kinfind")));
    assert_eq!(config.verifier.url, "http://faces.internal:5005");
    assert_eq!(config.verifier.model_name, "VGG-Face");
    assert_eq!(config.verifier.timeout_secs, 60);
    assert!(config.verifier.enforce_detection);
}

#[test]
fn test_face_detection_can_be_relaxed() {
    let config = TomlConfig::from_toml_str(
        r#"
        [verifier]
        enforce_detection = false
        "#,
    )
    .unwrap();

    assert!(!config.verifier.enforce_detection);
    assert_eq!(config.verifier.detector_backend, "opencv");
}

#[test]
fn test_malformed_config_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let result = TomlConfig::load_or_default(&path);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_resolver_cli_takes_precedence() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/kinfind-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/kinfind-toml")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/kinfind-cli")), &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/kinfind-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/kinfind-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/kinfind-toml")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/kinfind-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/kinfind-toml")),
        ..TomlConfig::default()
    };
    assert_eq!(
        RootFolderResolver::new(None, &config).resolve(),
        PathBuf::from("/tmp/kinfind-toml")
    );

    let resolver = RootFolderResolver::new(None, &TomlConfig::default());
    assert_eq!(resolver.resolve(), default_root_folder());
}

#[test]
fn test_initializer_paths() {
    let root = PathBuf::from("/tmp/kinfind-test-root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert_eq!(initializer.database_path(), root.join("kinfind.db"));
    assert_eq!(initializer.images_path(), root.join("images"));
}

#[test]
fn test_initializer_idempotent_directory_creation() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("root");
    let initializer = RootFolderInitializer::new(root.clone());

    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(initializer.ensure_directory_exists().is_ok());
    assert!(root.is_dir());
    assert!(!initializer.database_exists());
}
