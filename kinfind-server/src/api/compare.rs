//! Face comparison endpoint

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use crate::api::form::UploadForm;
use crate::error::ApiResult;
use crate::image_check;
use crate::matching::{self, CompareOutcome};
use crate::AppState;

/// POST /compare
///
/// Form field: image. The probe photo is held in memory only.
pub async fn compare(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<CompareOutcome>> {
    let mut form = UploadForm::read(multipart).await?;
    let probe = form.take_image()?;

    image_check::inspect(probe.clone()).await?;

    let outcome = matching::find_matches(&state, &probe).await?;
    Ok(Json(outcome))
}

pub fn compare_routes() -> Router<AppState> {
    Router::new().route("/compare", post(compare))
}
