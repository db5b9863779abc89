//! kinfind-server - Missing / found child matching service
//!
//! Guardians report missing children, finders report found children, and
//! `/compare` checks an uploaded photo against every found report using an
//! external face verification service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use kinfind_common::config::{
    default_config_path, RootFolderInitializer, RootFolderResolver, TomlConfig,
};
use kinfind_common::{db, ImageStore};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kinfind_server::verifier::DeepFaceClient;
use kinfind_server::{build_router, AppState};

/// Command-line arguments for kinfind-server
#[derive(Parser, Debug)]
#[command(name = "kinfind-server")]
#[command(about = "Missing / found child reporting and face matching service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "KINFIND_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the database and images
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long, env = "KINFIND_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "KINFIND_PORT")]
    port: Option<u16>,

    /// Base URL of the face verification API
    #[arg(long, env = "KINFIND_VERIFIER_URL")]
    verifier_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = TomlConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    // Command-line and environment override the file
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(url) = args.verifier_url {
        config.verifier.url = url;
    }

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!(
                    "kinfind_server={level},kinfind_common={level},tower_http={level}",
                    level = config.logging.level
                ))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting kinfind-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if config_path.exists() {
        info!("Config file: {}", config_path.display());
    } else {
        info!("Config file {} not found, using defaults", config_path.display());
    }

    let root_folder = RootFolderResolver::new(args.root_folder, &config).resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;
    info!("Root folder: {}", initializer.root().display());

    let db_path = initializer.database_path();
    let pool = db::init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let images = ImageStore::new(initializer.images_path());
    images.ensure_dirs().await?;
    info!("Image store: {}", images.root().display());

    let verifier = DeepFaceClient::new(&config.verifier)
        .context("Failed to create face verification client")?;
    info!("Face verification endpoint: {}", verifier.endpoint());

    let state = AppState::new(pool, images, Arc::new(verifier), config.max_upload_bytes);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;
    info!("kinfind-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("kinfind-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
