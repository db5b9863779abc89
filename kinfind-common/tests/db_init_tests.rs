//! Integration tests for on-disk database initialization

use kinfind_common::db::{init_database, insert_missing, list_missing};
use kinfind_common::models::{InsertOutcome, NewMissingChild};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sub").join("kinfind.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_reports_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("kinfind.db");

    let child = NewMissingChild {
        image_path: "missing/a.jpg".to_string(),
        image_hash: "deadbeef".to_string(),
        guardian_name: "Ravi".to_string(),
        guardian_phone: "555-0142".to_string(),
        guardian_email: "ravi@example.com".to_string(),
    };

    {
        let pool = init_database(&db_path).await.unwrap();
        let outcome = insert_missing(&pool, &child).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));
        pool.close().await;
    }

    // Second open must not recreate or wipe the tables
    let pool = init_database(&db_path).await.unwrap();
    let rows = list_missing(&pool).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].guardian_name, "Ravi");

    // Dedup still applies across restarts
    assert_eq!(
        insert_missing(&pool, &child).await.unwrap(),
        InsertOutcome::Duplicate
    );
}
