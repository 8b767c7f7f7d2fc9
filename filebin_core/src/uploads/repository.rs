use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::models::UploadedFile;
use crate::error::{AppError, Result};
use crate::storage::Blob;

#[async_trait]
pub trait UploadedFileRepositoryTrait: Send + Sync {
    async fn insert(&self, blob: &Blob) -> Result<UploadedFile>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UploadedFile>>;
    async fn list_all(&self) -> Result<Vec<UploadedFile>>;
}

#[derive(Clone)]
pub struct UploadedFileRepository {
    pool: SqlitePool,
}

impl UploadedFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_WITH_BLOB: &str = r#"
    SELECT uf.id, uf.created_at,
           b.key as blob_key, b.filename, b.content_type, b.byte_size, b.path,
           b.created_at as blob_created_at
    FROM uploaded_files uf
    JOIN blobs b ON b.key = uf.blob_key
"#;

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UploadedFile> {
    let blob = Blob {
        key: Uuid::parse_str(&row.get::<String, _>("blob_key"))
            .map_err(|e| AppError::Database(format!("Invalid blob key: {}", e)))?,
        filename: row.get("filename"),
        content_type: row.get("content_type"),
        byte_size: row.get::<i64, _>("byte_size") as u64,
        path: row.get("path"),
        created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("blob_created_at"))
            .map_err(|e| AppError::Database(format!("Invalid datetime: {}", e)))?
            .with_timezone(&Utc),
    };

    Ok(UploadedFile {
        id: row.get("id"),
        created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
            .map_err(|e| AppError::Database(format!("Invalid datetime: {}", e)))?
            .with_timezone(&Utc),
        blob: Some(blob),
    })
}

#[async_trait]
impl UploadedFileRepositoryTrait for UploadedFileRepository {
    async fn insert(&self, blob: &Blob) -> Result<UploadedFile> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO uploaded_files (blob_key, created_at) VALUES (?1, ?2)",
        )
        .bind(blob.key.to_string())
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(UploadedFile {
            id: result.last_insert_rowid(),
            created_at,
            blob: Some(blob.clone()),
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UploadedFile>> {
        let sql = format!("{} WHERE uf.id = ?1", SELECT_WITH_BLOB);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    // Insertion order ascending: rowids are monotonic under AUTOINCREMENT.
    async fn list_all(&self) -> Result<Vec<UploadedFile>> {
        let sql = format!("{} ORDER BY uf.id ASC", SELECT_WITH_BLOB);

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }
}
