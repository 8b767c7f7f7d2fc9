use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::models::Blob;
use crate::error::{AppError, Result};

#[async_trait]
pub trait BlobRepositoryTrait: Send + Sync {
    async fn create(&self, blob: &Blob) -> Result<Blob>;
    async fn get_by_key(&self, key: Uuid) -> Result<Option<Blob>>;
}

#[derive(Clone)]
pub struct BlobRepository {
    pool: SqlitePool,
}

impl BlobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn blob_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Blob> {
    Ok(Blob {
        key: Uuid::parse_str(&row.get::<String, _>("key"))
            .map_err(|e| AppError::Database(format!("Invalid blob key: {}", e)))?,
        filename: row.get("filename"),
        content_type: row.get("content_type"),
        byte_size: row.get::<i64, _>("byte_size") as u64,
        path: row.get("path"),
        created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
            .map_err(|e| AppError::Database(format!("Invalid datetime: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl BlobRepositoryTrait for BlobRepository {
    async fn create(&self, blob: &Blob) -> Result<Blob> {
        sqlx::query(
            r#"
            INSERT INTO blobs (key, filename, content_type, byte_size, path, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(blob.key.to_string())
        .bind(&blob.filename)
        .bind(&blob.content_type)
        .bind(blob.byte_size as i64)
        .bind(&blob.path)
        .bind(blob.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(blob.clone())
    }

    async fn get_by_key(&self, key: Uuid) -> Result<Option<Blob>> {
        let row = sqlx::query(
            "SELECT key, filename, content_type, byte_size, path, created_at FROM blobs WHERE key = ?1",
        )
        .bind(key.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(blob_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_database_pool, run_migrations};
    use tempfile::NamedTempFile;

    async fn create_test_pool() -> SqlitePool {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = get_database_pool(&database_url).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        pool
    }

    #[tokio::test]
    async fn test_blob_repository_round_trip() {
        let pool = create_test_pool().await;
        let repo = BlobRepository::new(pool);

        let blob = Blob {
            key: Uuid::new_v4(),
            filename: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            byte_size: 2048,
            path: "/storage/report.pdf".to_string(),
            created_at: Utc::now(),
        };

        let created = repo.create(&blob).await.unwrap();
        assert_eq!(created.key, blob.key);

        let retrieved = repo.get_by_key(blob.key).await.unwrap().unwrap();
        assert_eq!(retrieved.filename, "report.pdf");
        assert_eq!(retrieved.content_type, "application/pdf");
        assert_eq!(retrieved.byte_size, 2048);
    }

    #[tokio::test]
    async fn test_get_by_key_missing() {
        let pool = create_test_pool().await;
        let repo = BlobRepository::new(pool);

        let found = repo.get_by_key(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }
}
