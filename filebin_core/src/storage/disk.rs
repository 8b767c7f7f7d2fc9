use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::models::Blob;
use super::repository::{BlobRepository, BlobRepositoryTrait};
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct DiskBlobStoreConfig {
    pub root: PathBuf,
    pub fan_out: bool,
}

impl Default for DiskBlobStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
            fan_out: true,
        }
    }
}

/// Disk-backed blob store: bytes under the configured root, one metadata row
/// per blob. Metadata is committed only after the bytes are synced.
#[derive(Clone)]
pub struct DiskBlobStore {
    config: DiskBlobStoreConfig,
    repository: BlobRepository,
}

impl DiskBlobStore {
    pub fn new(config: DiskBlobStoreConfig, repository: BlobRepository) -> Self {
        Self { config, repository }
    }

    pub async fn initialize(&self) -> Result<()> {
        if !self.config.root.exists() {
            async_fs::create_dir_all(&self.config.root)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create storage root: {}", e)))?;
        }

        Ok(())
    }

    pub async fn put(&self, filename: &str, content_type: &str, data: &[u8]) -> Result<Blob> {
        let key = Uuid::new_v4();
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let stored_name = if extension.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", key, extension)
        };

        let target = if self.config.fan_out {
            let now = Utc::now();
            let subdir = format!("{}/{:02}", now.year(), now.month());
            let full_subdir = self.config.root.join(&subdir);

            if !full_subdir.exists() {
                async_fs::create_dir_all(&full_subdir)
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to create subdirectory: {}", e)))?;
            }

            full_subdir.join(&stored_name)
        } else {
            self.config.root.join(&stored_name)
        };

        // Handle is scoped to this block so the file is closed on every path.
        {
            let mut file = async_fs::File::create(&target)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create blob file: {}", e)))?;
            file.write_all(data)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to write blob bytes: {}", e)))?;
            file.sync_all()
                .await
                .map_err(|e| AppError::Storage(format!("Failed to sync blob bytes: {}", e)))?;
        }

        let blob = Blob {
            key,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            byte_size: data.len() as u64,
            path: target.to_string_lossy().to_string(),
            created_at: Utc::now(),
        };

        self.repository.create(&blob).await
    }

    pub async fn get(&self, key: Uuid) -> Result<Option<Blob>> {
        self.repository.get_by_key(key).await
    }

    pub async fn read(&self, blob: &Blob) -> Result<Vec<u8>> {
        async_fs::read(Path::new(&blob.path)).await.map_err(|e| {
            tracing::error!("Failed to read blob {}: {}", blob.path, e);
            AppError::Storage(format!("Blob bytes missing for key {}", blob.key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_database_pool, run_migrations};
    use tempfile::{NamedTempFile, TempDir};

    async fn create_test_store() -> (DiskBlobStore, TempDir) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());
        let pool = get_database_pool(&database_url).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        let temp_dir = TempDir::new().unwrap();
        let config = DiskBlobStoreConfig {
            root: temp_dir.path().to_path_buf(),
            fan_out: false,
        };

        let store = DiskBlobStore::new(config, BlobRepository::new(pool));
        store.initialize().await.unwrap();

        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_put_and_read_blob() {
        let (store, _temp_dir) = create_test_store().await;

        let blob = store
            .put("hello.txt", "text/plain", b"Hello, World!")
            .await
            .unwrap();

        assert_eq!(blob.filename, "hello.txt");
        assert_eq!(blob.content_type, "text/plain");
        assert_eq!(blob.byte_size, 13);

        let stored = store.get(blob.key).await.unwrap().unwrap();
        assert_eq!(stored.filename, "hello.txt");

        let data = store.read(&stored).await.unwrap();
        assert_eq!(data, b"Hello, World!");
    }

    #[tokio::test]
    async fn test_stored_name_keeps_extension() {
        let (store, temp_dir) = create_test_store().await;

        let blob = store
            .put("photo.png", "image/png", &[0x89, 0x50, 0x4E, 0x47])
            .await
            .unwrap();

        let stored_path = Path::new(&blob.path);
        assert_eq!(stored_path.extension().unwrap(), "png");
        assert!(stored_path.starts_with(temp_dir.path()));
    }

    #[tokio::test]
    async fn test_read_missing_bytes_is_storage_error() {
        let (store, _temp_dir) = create_test_store().await;

        let blob = store.put("gone.txt", "text/plain", b"bytes").await.unwrap();
        async_fs::remove_file(&blob.path).await.unwrap();

        let err = store.read(&blob).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
