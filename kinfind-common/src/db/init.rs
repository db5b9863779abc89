//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates both report tables.
//! Table creation is idempotent, so this runs on every startup.

use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets the list endpoints read while an upload is writing
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Single connection: every connection to `:memory:` is a separate database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create both report tables (idempotent)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_missing_children_table(pool).await?;
    create_found_children_table(pool).await?;
    debug!("Database tables initialized (missing_children, found_children)");
    Ok(())
}

async fn create_missing_children_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS missing_children (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_path TEXT NOT NULL,
            image_hash TEXT NOT NULL,
            guardian_name TEXT NOT NULL,
            guardian_phone TEXT NOT NULL,
            guardian_email TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Duplicate reports are rejected by content hash
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_missing_children_hash ON missing_children(image_hash)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_found_children_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS found_children (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_path TEXT NOT NULL,
            image_hash TEXT NOT NULL,
            finder_name TEXT NOT NULL,
            finder_phone TEXT NOT NULL,
            finder_email TEXT NOT NULL,
            found_location TEXT NOT NULL,
            collect_location TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete every report from both tables in one transaction
///
/// Returns the number of rows removed.
pub async fn clear_all(pool: &SqlitePool) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let missing = sqlx::query("DELETE FROM missing_children")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let found = sqlx::query("DELETE FROM found_children")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    info!(missing, found, "Cleared all reports");
    Ok(missing + found)
}
