//! Compare a probe photo against every found-child report
//!
//! Linear scan in insertion order: one verifier call per found report.
//! A candidate whose image cannot be read or decoded, or whose verification
//! fails, is skipped; the scan always runs to the end.

use kinfind_common::content_hash;
use kinfind_common::db;
use kinfind_common::models::FoundChild;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiResult;
use crate::image_check;
use crate::AppState;

/// Contact details of a finder whose report matched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub finder_name: String,
    pub phone: String,
    pub email: String,
    pub found_location: String,
    pub collect_location: String,
}

impl From<&FoundChild> for MatchCandidate {
    fn from(child: &FoundChild) -> Self {
        Self {
            finder_name: child.finder_name.clone(),
            phone: child.finder_phone.clone(),
            email: child.finder_email.clone(),
            found_location: child.found_location.clone(),
            collect_location: child.collect_location.clone(),
        }
    }
}

/// Result of a compare request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareOutcome {
    #[serde(rename = "match")]
    pub matched: bool,
    pub results: Vec<MatchCandidate>,
    /// A missing report with byte-identical photo already exists
    pub already_reported: bool,
}

/// Scan all found reports for faces matching `probe`
///
/// `probe` must already have been validated as a decodable image.
pub async fn find_matches(state: &AppState, probe: &[u8]) -> ApiResult<CompareOutcome> {
    let hash = content_hash(probe);
    let already_reported = db::find_missing_by_hash(&state.db, &hash).await?.is_some();
    let candidates = db::list_found(&state.db).await?;

    debug!(
        candidates = candidates.len(),
        already_reported,
        verifier = state.verifier.name(),
        "Starting face comparison"
    );

    let mut results = Vec::new();
    for child in &candidates {
        let candidate = match state.images.read(&child.image_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = child.id, path = %child.image_path, error = %e, "Skipping unreadable found image");
                continue;
            }
        };

        let (candidate, decodable) = check_decodable(candidate).await;
        if !decodable {
            warn!(id = child.id, path = %child.image_path, "Skipping undecodable found image");
            continue;
        }

        match state.verifier.verify(probe, &candidate).await {
            Ok(verification) if verification.verified => {
                info!(id = child.id, distance = ?verification.distance, "Face match");
                results.push(MatchCandidate::from(child));
            }
            Ok(_) => {}
            Err(e) => {
                warn!(id = child.id, error = %e, "Face verification failed, skipping candidate");
                state
                    .record_error(format!("Verification of found report {} failed: {}", child.id, e))
                    .await;
            }
        }
    }

    info!(
        scanned = candidates.len(),
        matches = results.len(),
        already_reported,
        "Face comparison finished"
    );

    Ok(CompareOutcome {
        matched: !results.is_empty(),
        results,
        already_reported,
    })
}

/// Decode on the blocking pool, handing the bytes back to the caller
async fn check_decodable(bytes: Vec<u8>) -> (Vec<u8>, bool) {
    let len = bytes.len();
    tokio::task::spawn_blocking(move || {
        let ok = image_check::decode(&bytes).is_some();
        (bytes, ok)
    })
    .await
    .unwrap_or_else(|e| {
        warn!(error = %e, len, "Image decode task failed");
        (Vec::new(), false)
    })
}
