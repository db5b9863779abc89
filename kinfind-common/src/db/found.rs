//! Found-child report queries

use crate::models::{FoundChild, NewFoundChild};
use crate::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Insert a found-child report, returning its id
pub async fn insert_found(pool: &SqlitePool, child: &NewFoundChild) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO found_children
            (image_path, image_hash, finder_name, finder_phone, finder_email,
             found_location, collect_location)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&child.image_path)
    .bind(&child.image_hash)
    .bind(&child.finder_name)
    .bind(&child.finder_phone)
    .bind(&child.finder_email)
    .bind(&child.found_location)
    .bind(&child.collect_location)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!(id, path = %child.image_path, "Recorded found-child report");
    Ok(id)
}

/// All found-child reports in the order they were made
pub async fn list_found(pool: &SqlitePool) -> Result<Vec<FoundChild>> {
    let rows = sqlx::query_as::<_, FoundChild>(
        r#"
        SELECT id, image_path, image_hash, finder_name, finder_phone, finder_email,
               found_location, collect_location, created_at
        FROM found_children
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_found(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM found_children")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{clear_all, count_missing, init_memory_database, insert_missing};
    use crate::models::NewMissingChild;

    fn report(n: u32) -> NewFoundChild {
        NewFoundChild {
            image_path: format!("found/{}.jpg", n),
            image_hash: format!("hash-{}", n),
            finder_name: format!("Finder {}", n),
            finder_phone: "555-0199".to_string(),
            finder_email: "finder@example.com".to_string(),
            found_location: "Central Station".to_string(),
            collect_location: "Police Post 4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_found_reports_are_not_deduplicated() {
        let pool = init_memory_database().await.unwrap();

        let a = insert_found(&pool, &report(1)).await.unwrap();
        let b = insert_found(&pool, &report(1)).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(count_found(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_found_fields() {
        let pool = init_memory_database().await.unwrap();
        insert_found(&pool, &report(7)).await.unwrap();

        let rows = list_found(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].finder_name, "Finder 7");
        assert_eq!(rows[0].found_location, "Central Station");
        assert_eq!(rows[0].collect_location, "Police Post 4");
    }

    #[tokio::test]
    async fn test_clear_all_empties_both_tables() {
        let pool = init_memory_database().await.unwrap();
        insert_found(&pool, &report(1)).await.unwrap();
        insert_missing(
            &pool,
            &NewMissingChild {
                image_path: "missing/x.jpg".to_string(),
                image_hash: "x".to_string(),
                guardian_name: "G".to_string(),
                guardian_phone: "1".to_string(),
                guardian_email: "g@example.com".to_string(),
            },
        )
        .await
        .unwrap();

        let removed = clear_all(&pool).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(count_found(&pool).await.unwrap(), 0);
        assert_eq!(count_missing(&pool).await.unwrap(), 0);
    }
}
