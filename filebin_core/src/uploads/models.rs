use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Blob;

/// One persisted upload. Every row owns exactly one blob; the repository
/// always resolves it, so `blob` is `None` only if that invariant was
/// broken outside this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub blob: Option<Blob>,
}

/// Raw file data as it arrived in a create request, before any storage.
#[derive(Debug)]
pub struct SubmittedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
