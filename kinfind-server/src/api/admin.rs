//! Data clearing endpoints
//!
//! Both endpoints wipe every report and stored image. `/clear-matched` is what
//! the UI calls after a confirmed match; `/reset-all` is always available.

use axum::{extract::State, routing::post, Json, Router};
use kinfind_common::db;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::AppState;

pub const ALL_CLEARED: &str = "ALL DATA CLEARED";
pub const MATCHED_CLEARED: &str = "MATCHED DATA CLEARED";

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub removed_records: u64,
    pub removed_images: usize,
}

/// POST /reset-all
pub async fn reset_all(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    clear_everything(&state, ALL_CLEARED).await
}

/// POST /clear-matched
pub async fn clear_matched(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    clear_everything(&state, MATCHED_CLEARED).await
}

async fn clear_everything(state: &AppState, message: &str) -> ApiResult<Json<ClearResponse>> {
    // Waits for uploads still storing a report
    let _guard = state.reports_lock.write().await;

    // No row may outlive its image, so rows go first
    let removed_records = db::clear_all(&state.db).await?;
    let removed_images = state.images.clear().await?;
    state.images.ensure_dirs().await?;

    info!(removed_records, removed_images, "{}", message);

    Ok(Json(ClearResponse {
        message: message.to_string(),
        removed_records,
        removed_images,
    }))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/reset-all", post(reset_all))
        .route("/clear-matched", post(clear_matched))
}
