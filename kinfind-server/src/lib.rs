//! kinfind-server library interface
//!
//! HTTP service for missing / found child reports and face matching.
//! Exposed as a library so integration tests can drive the router directly.

pub mod api;
pub mod error;
pub mod image_check;
pub mod matching;
pub mod verifier;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use kinfind_common::ImageStore;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::verifier::FaceVerifier;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Stored report images
    pub images: ImageStore,
    /// External face verification backend
    pub verifier: Arc<dyn FaceVerifier>,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last verifier failure, reported by /health
    pub last_error: Arc<RwLock<Option<String>>>,
    /// Shared while a report and its image are stored, exclusive while clearing
    pub reports_lock: Arc<RwLock<()>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        images: ImageStore,
        verifier: Arc<dyn FaceVerifier>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db,
            images,
            verifier,
            max_upload_bytes,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            reports_lock: Arc::new(RwLock::new(())),
        }
    }

    /// Remember a failure for diagnostics
    pub async fn record_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(state.images.root());
    let body_limit = state.max_upload_bytes;

    Router::new()
        // UI routes (embedded HTML/CSS/JS)
        .merge(api::ui_routes())
        // API routes
        .merge(api::report_routes())
        .merge(api::compare_routes())
        .merge(api::admin_routes())
        .merge(api::health_routes())
        // Stored images
        .nest_service("/images", images)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        // The UI may be served from another origin during development
        .layer(CorsLayer::permissive())
}
