//! Multipart form collection for report uploads

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;

use crate::error::{ApiError, ApiResult};

/// Field carrying the photo in every upload form
pub const IMAGE_FIELD: &str = "image";

/// A fully read multipart upload
#[derive(Debug, Default)]
pub struct UploadForm {
    image: Option<Bytes>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain a multipart body. Unknown fields are kept; unnamed parts are ignored.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let data = field
                    .bytes()
                    .await
                    .map_err(multipart_error)?;
                form.image = Some(data);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// The uploaded photo; 400 when absent
    pub fn take_image(&mut self) -> ApiResult<Bytes> {
        self.image
            .take()
            .ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", IMAGE_FIELD)))
    }

    /// A required text field, trimmed; 400 when absent
    pub fn require(&mut self, name: &str) -> ApiResult<String> {
        self.fields
            .remove(name)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| ApiError::BadRequest(format!("Missing field: {}", name)))
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("Upload too large: {}", e.body_text()))
    } else {
        ApiError::BadRequest(format!("Multipart error: {}", e.body_text()))
    }
}
