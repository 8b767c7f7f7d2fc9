use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{error, info};

use crate::error::{AppError, Result};

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Starting database migrations");

        self.create_migrations_table().await?;

        let current_version = self.get_current_version().await?;
        info!("Current migration version: {}", current_version);

        let migrations = self.get_migrations();
        let mut applied_count = 0;

        for migration in migrations {
            if migration.version > current_version {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply_migration(&migration).await?;
                applied_count += 1;
            }
        }

        if applied_count > 0 {
            info!("Applied {} migrations successfully", applied_count);
        } else {
            info!("No new migrations to apply");
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn get_current_version(&self) -> Result<i64> {
        let result = sqlx::query("SELECT MAX(version) as version FROM _migrations")
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        match result {
            Some(row) => Ok(row.try_get("version").unwrap_or(0)),
            None => Ok(0),
        }
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in &migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query(r#"
            INSERT INTO _migrations (version, name, checksum)
            VALUES (?, ?, ?)
        "#)
        .bind(migration.version)
        .bind(&migration.name)
        .bind(&migration.checksum)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }

    fn get_migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                version: 1,
                name: "create_blobs_table".to_string(),
                checksum: "blobs_v1".to_string(),
                sql_statements: vec![
                    r#"
                    CREATE TABLE blobs (
                        key TEXT PRIMARY KEY,
                        filename TEXT NOT NULL,
                        content_type TEXT NOT NULL,
                        byte_size INTEGER NOT NULL,
                        path TEXT NOT NULL,
                        created_at TEXT NOT NULL
                    )
                    "#.to_string(),
                    r#"
                    CREATE INDEX idx_blobs_content_type ON blobs(content_type)
                    "#.to_string(),
                ],
            },
            Migration {
                version: 2,
                name: "create_uploaded_files_table".to_string(),
                checksum: "uploaded_files_v1".to_string(),
                sql_statements: vec![
                    r#"
                    CREATE TABLE uploaded_files (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        blob_key TEXT NOT NULL UNIQUE,
                        created_at TEXT NOT NULL,
                        FOREIGN KEY (blob_key) REFERENCES blobs(key)
                    )
                    "#.to_string(),
                    r#"
                    CREATE INDEX idx_uploaded_files_blob_key ON uploaded_files(blob_key)
                    "#.to_string(),
                ],
            },
        ]
    }

    pub async fn get_migration_history(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query(r#"
            SELECT version, name, applied_at, checksum
            FROM _migrations
            ORDER BY version
        "#)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(MigrationRecord {
                version: row.try_get("version").unwrap_or(0),
                name: row.try_get("name").unwrap_or_default(),
                applied_at: row.try_get("applied_at").unwrap_or_else(|_| Utc::now()),
                checksum: row.try_get("checksum").unwrap_or_default(),
            });
        }

        Ok(records)
    }
}

#[derive(Debug, Clone)]
struct Migration {
    version: i64,
    name: String,
    checksum: String,
    sql_statements: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    let migration_manager = MigrationManager::new(pool);
    migration_manager.run_migrations().await
}
