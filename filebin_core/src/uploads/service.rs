use super::models::{SubmittedFile, UploadedFile};
use super::repository::{UploadedFileRepository, UploadedFileRepositoryTrait};
use crate::error::{AppError, Result};
use crate::storage::{Blob, DiskBlobStore};

/// Orchestrates an upload: bytes go to the blob store, then one entity row
/// wraps the resulting blob reference.
#[derive(Clone)]
pub struct UploadService {
    store: DiskBlobStore,
    repository: UploadedFileRepository,
}

impl UploadService {
    pub fn new(store: DiskBlobStore, repository: UploadedFileRepository) -> Self {
        Self { store, repository }
    }

    pub async fn create_from_submitted(&self, submitted: SubmittedFile) -> Result<UploadedFile> {
        if submitted.data.is_empty() {
            return Err(AppError::Validation("No file submitted".to_string()));
        }

        let blob = self
            .store
            .put(&submitted.filename, &submitted.content_type, &submitted.data)
            .await?;

        let record = self.repository.insert(&blob).await?;

        tracing::info!(
            id = record.id,
            filename = %blob.filename,
            byte_size = blob.byte_size,
            "stored uploaded file"
        );

        Ok(record)
    }

    pub async fn find(&self, id: i64) -> Result<UploadedFile> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Uploaded file {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<UploadedFile>> {
        self.repository.list_all().await
    }

    pub async fn blob_bytes(&self, id: i64) -> Result<(Blob, Vec<u8>)> {
        let record = self.find(id).await?;
        let blob = record.blob.ok_or(AppError::MissingBlob)?;
        let data = self.store.read(&blob).await?;

        Ok((blob, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_database_pool, run_migrations};
    use crate::storage::{BlobRepository, DiskBlobStoreConfig};
    use tempfile::{NamedTempFile, TempDir};

    async fn create_test_service() -> (UploadService, TempDir) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());
        let pool = get_database_pool(&database_url).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        let temp_dir = TempDir::new().unwrap();
        let config = DiskBlobStoreConfig {
            root: temp_dir.path().to_path_buf(),
            fan_out: false,
        };

        let store = DiskBlobStore::new(config, BlobRepository::new(pool.clone()));
        store.initialize().await.unwrap();

        let service = UploadService::new(store, UploadedFileRepository::new(pool));

        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_create_round_trip() {
        let (service, _temp_dir) = create_test_service().await;

        let submitted = SubmittedFile {
            filename: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            data: b"remember the milk".to_vec(),
        };

        let created = service.create_from_submitted(submitted).await.unwrap();

        let found = service.find(created.id).await.unwrap();
        let blob = found.blob.expect("created record must carry its blob");
        assert_eq!(blob.filename, "notes.txt");
        assert_eq!(blob.content_type, "text/plain");

        let (_, data) = service.blob_bytes(created.id).await.unwrap();
        assert_eq!(data, b"remember the milk");
    }

    #[tokio::test]
    async fn test_empty_submission_is_rejected() {
        let (service, _temp_dir) = create_test_service().await;

        let submitted = SubmittedFile {
            filename: "empty.txt".to_string(),
            content_type: "text/plain".to_string(),
            data: Vec::new(),
        };

        let err = service.create_from_submitted(submitted).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Nothing must have been persisted.
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_unknown_id() {
        let (service, _temp_dir) = create_test_service().await;

        let err = service.find(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
