//! Missing-child report queries

use crate::models::{InsertOutcome, MissingChild, NewMissingChild};
use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Insert a missing-child report unless one with the same image hash exists
///
/// The UNIQUE index on `image_hash` makes the check-and-insert atomic.
pub async fn insert_missing(pool: &SqlitePool, child: &NewMissingChild) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO missing_children
            (image_path, image_hash, guardian_name, guardian_phone, guardian_email)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(image_hash) DO NOTHING
        "#,
    )
    .bind(&child.image_path)
    .bind(&child.image_hash)
    .bind(&child.guardian_name)
    .bind(&child.guardian_phone)
    .bind(&child.guardian_email)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        debug!(hash = %child.image_hash, "Missing-child report already exists");
        return Ok(InsertOutcome::Duplicate);
    }

    let id = result.last_insert_rowid();
    info!(id, path = %child.image_path, "Recorded missing-child report");
    Ok(InsertOutcome::Inserted(id))
}

/// Look up a missing-child report by content hash
pub async fn find_missing_by_hash(pool: &SqlitePool, hash: &str) -> Result<Option<MissingChild>> {
    let row = sqlx::query_as::<_, MissingChild>(
        r#"
        SELECT id, image_path, image_hash, guardian_name, guardian_phone, guardian_email, created_at
        FROM missing_children
        WHERE image_hash = ?
        "#,
    )
    .bind(hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All missing-child reports in the order they were made
pub async fn list_missing(pool: &SqlitePool) -> Result<Vec<MissingChild>> {
    let rows = sqlx::query_as::<_, MissingChild>(
        r#"
        SELECT id, image_path, image_hash, guardian_name, guardian_phone, guardian_email, created_at
        FROM missing_children
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_missing(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM missing_children")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
