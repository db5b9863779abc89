//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A child reported missing by a guardian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MissingChild {
    pub id: i64,
    /// Path relative to the image root, e.g. `missing/<uuid>.jpg`
    pub image_path: String,
    pub image_hash: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMissingChild {
    pub image_path: String,
    pub image_hash: String,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub guardian_email: String,
}

/// A child reported found by a finder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoundChild {
    pub id: i64,
    pub image_path: String,
    pub image_hash: String,
    pub finder_name: String,
    pub finder_phone: String,
    pub finder_email: String,
    /// Where the child was found
    pub found_location: String,
    /// Where the guardian can collect the child
    pub collect_location: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewFoundChild {
    pub image_path: String,
    pub image_hash: String,
    pub finder_name: String,
    pub finder_phone: String,
    pub finder_email: String,
    pub found_location: String,
    pub collect_location: String,
}

/// Result of inserting a missing-child report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New row created with this id
    Inserted(i64),
    /// A report with the same content hash already exists
    Duplicate,
}
