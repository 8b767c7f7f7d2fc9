pub mod models;
pub mod repository;
pub mod service;

pub use models::{SubmittedFile, UploadedFile};
pub use repository::{UploadedFileRepository, UploadedFileRepositoryTrait};
pub use service::UploadService;
