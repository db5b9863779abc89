//! Missing / found report endpoints
//!
//! - POST /upload-missing: guardian reports a missing child (deduplicated by photo hash)
//! - POST /upload-found: finder reports a found child
//! - GET /missing-children, GET /found-children: list reports

use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDateTime;
use kinfind_common::db;
use kinfind_common::models::{InsertOutcome, NewFoundChild, NewMissingChild};
use kinfind_common::{content_hash, ImageKind, ImageStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::form::UploadForm;
use crate::error::ApiResult;
use crate::image_check;
use crate::AppState;

pub const MISSING_ADDED: &str = "Missing child added";
pub const ALREADY_REPORTED: &str = "Already reported";
pub const FOUND_ADDED: &str = "Found child added";

/// Upload acknowledgement
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Id of the new report; absent for duplicates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl UploadResponse {
    fn created(message: &str, id: i64) -> Self {
        Self {
            message: message.to_string(),
            id: Some(id),
        }
    }

    fn duplicate() -> Self {
        Self {
            message: ALREADY_REPORTED.to_string(),
            id: None,
        }
    }
}

/// Missing-child listing entry
#[derive(Debug, Serialize)]
pub struct MissingChildView {
    pub id: i64,
    /// URL of the stored photo
    pub image: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub reported_at: NaiveDateTime,
}

/// Found-child listing entry
#[derive(Debug, Serialize)]
pub struct FoundChildView {
    pub id: i64,
    pub image: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub found_location: String,
    pub collect_location: String,
    pub reported_at: NaiveDateTime,
}

/// POST /upload-missing
///
/// Form fields: image, name, phone, email
pub async fn upload_missing(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_image()?;
    let guardian_name = form.require("name")?;
    let guardian_phone = form.require("phone")?;
    let guardian_email = form.require("email")?;

    let info = image_check::inspect(image.clone()).await?;
    let image_hash = content_hash(&image);

    // A clear must not run between the file write and the insert
    let _guard = state.reports_lock.read().await;

    if db::find_missing_by_hash(&state.db, &image_hash).await?.is_some() {
        info!(hash = %image_hash, "Missing child already reported");
        return Ok(Json(UploadResponse::duplicate()));
    }

    let image_path = state
        .images
        .save(ImageKind::Missing, &image, info.extension())
        .await?;

    let report = NewMissingChild {
        image_path: image_path.clone(),
        image_hash,
        guardian_name,
        guardian_phone,
        guardian_email,
    };

    let outcome = match db::insert_missing(&state.db, &report).await {
        Ok(outcome) => outcome,
        Err(e) => {
            discard_image(&state.images, &image_path).await;
            return Err(e.into());
        }
    };

    match outcome {
        InsertOutcome::Inserted(id) => Ok(Json(UploadResponse::created(MISSING_ADDED, id))),
        InsertOutcome::Duplicate => {
            // Lost a race with a concurrent upload of the same photo
            discard_image(&state.images, &image_path).await;
            Ok(Json(UploadResponse::duplicate()))
        }
    }
}

/// POST /upload-found
///
/// Form fields: image, name, phone, email, found_location, collect_location
pub async fn upload_found(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_image()?;
    let finder_name = form.require("name")?;
    let finder_phone = form.require("phone")?;
    let finder_email = form.require("email")?;
    let found_location = form.require("found_location")?;
    let collect_location = form.require("collect_location")?;

    let info = image_check::inspect(image.clone()).await?;

    let _guard = state.reports_lock.read().await;

    let image_path = state
        .images
        .save(ImageKind::Found, &image, info.extension())
        .await?;

    let report = NewFoundChild {
        image_path: image_path.clone(),
        image_hash: content_hash(&image),
        finder_name,
        finder_phone,
        finder_email,
        found_location,
        collect_location,
    };

    match db::insert_found(&state.db, &report).await {
        Ok(id) => Ok(Json(UploadResponse::created(FOUND_ADDED, id))),
        Err(e) => {
            discard_image(&state.images, &image_path).await;
            Err(e.into())
        }
    }
}

/// GET /missing-children
pub async fn list_missing(State(state): State<AppState>) -> ApiResult<Json<Vec<MissingChildView>>> {
    let rows = db::list_missing(&state.db).await?;

    Ok(Json(
        rows.into_iter()
            .map(|r| MissingChildView {
                id: r.id,
                image: ImageStore::public_url(&r.image_path),
                name: r.guardian_name,
                phone: r.guardian_phone,
                email: r.guardian_email,
                reported_at: r.created_at,
            })
            .collect(),
    ))
}

/// GET /found-children
pub async fn list_found(State(state): State<AppState>) -> ApiResult<Json<Vec<FoundChildView>>> {
    let rows = db::list_found(&state.db).await?;

    Ok(Json(
        rows.into_iter()
            .map(|r| FoundChildView {
                id: r.id,
                image: ImageStore::public_url(&r.image_path),
                name: r.finder_name,
                phone: r.finder_phone,
                email: r.finder_email,
                found_location: r.found_location,
                collect_location: r.collect_location,
                reported_at: r.created_at,
            })
            .collect(),
    ))
}

/// Best-effort removal of an image whose report was not recorded
async fn discard_image(images: &ImageStore, path: &str) {
    if let Err(e) = images.remove(path).await {
        warn!(path = %path, error = %e, "Failed to remove orphaned image");
    }
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-missing", post(upload_missing))
        .route("/upload-found", post(upload_found))
        .route("/missing-children", get(list_missing))
        .route("/found-children", get(list_found))
}
