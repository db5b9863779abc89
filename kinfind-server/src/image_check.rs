//! Upload validation
//!
//! Every uploaded photo must decode as an image before it is stored or
//! compared. Decoding is CPU-bound, so it runs on the blocking pool.

use axum::body::Bytes;
use image::ImageFormat;

use crate::error::{ApiError, ApiResult};

pub const INVALID_IMAGE: &str = "Invalid image";

/// Facts about a decodable upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    /// File extension used when storing the image
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// Decode the bytes synchronously, returning `None` when they are not an image
pub fn decode(bytes: &[u8]) -> Option<ImageInfo> {
    let format = image::guess_format(bytes).ok()?;
    let decoded = image::load_from_memory_with_format(bytes, format).ok()?;
    Some(ImageInfo {
        format,
        width: decoded.width(),
        height: decoded.height(),
    })
}

/// Validate an upload, rejecting undecodable data with 400 "Invalid image"
pub async fn inspect(bytes: Bytes) -> ApiResult<ImageInfo> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest(INVALID_IMAGE.to_string()));
    }

    let info = tokio::task::spawn_blocking(move || decode(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("Image decode task failed: {}", e)))?;

    info.ok_or_else(|| ApiError::BadRequest(INVALID_IMAGE.to_string()))
}
