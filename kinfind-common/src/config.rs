//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a single TOML file. Every field has a
//! built-in default, so a missing file is a warning, never a startup failure.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `KINFIND_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "KINFIND_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "kinfind.db";

/// Image directory name inside the root folder
pub const IMAGES_DIR: &str = "images";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder holding the database and stored images
    pub root_folder: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// Largest accepted request body (multipart uploads)
    pub max_upload_bytes: usize,

    /// External face verification service
    pub verifier: VerifierConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_bytes: 16 * 1024 * 1024,
            verifier: VerifierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Settings for the external face verification service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Base URL of the DeepFace-compatible API (the `/verify` path is appended)
    pub url: String,

    /// Recognition model requested from the service
    pub model_name: String,

    /// Face detector backend requested from the service
    pub detector_backend: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// When true a photo without a detectable face fails verification
    pub enforce_detection: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5005".to_string(),
            model_name: "VGG-Face".to_string(),
            detector_backend: "opencv".to_string(),
            timeout_secs: 60,
            enforce_detection: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load the config file, falling back to defaults when it does not exist
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("kinfind").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("kinfind.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("kinfind"))
        .unwrap_or_else(|| PathBuf::from("./kinfind_data"))
}

/// Resolves the root folder from the layered configuration sources
#[derive(Debug, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            toml_value: config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        default_root_folder()
    }
}

/// Creates the root folder layout and exposes the paths inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            Error::Config(format!(
                "Failed to create root folder {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }

    pub fn images_path(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
