use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored binary object. The bytes themselves live on disk
/// under `path`; everything the presentation layer needs is in here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blob {
    pub key: Uuid,
    pub filename: String,
    pub content_type: String,
    pub byte_size: u64,
    pub path: String,
    pub created_at: DateTime<Utc>,
}
