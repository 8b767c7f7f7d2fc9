pub mod disk;
pub mod models;
pub mod repository;

pub use disk::{DiskBlobStore, DiskBlobStoreConfig};
pub use models::Blob;
pub use repository::{BlobRepository, BlobRepositoryTrait};
