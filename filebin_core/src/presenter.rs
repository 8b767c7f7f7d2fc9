//! Pure display helpers over uploaded-file records. No I/O, no state.

use crate::error::{AppError, Result};
use crate::uploads::UploadedFile;

/// Original filename of the record's blob. Loaded records always carry one;
/// a missing blob is an invariant breach surfaced as `MissingBlob`.
pub fn filename(file: &UploadedFile) -> Result<&str> {
    file.blob
        .as_ref()
        .map(|blob| blob.filename.as_str())
        .ok_or(AppError::MissingBlob)
}

/// Declared MIME type of the record's blob, e.g. `image/png`.
pub fn content_type(file: &UploadedFile) -> Result<&str> {
    file.blob
        .as_ref()
        .map(|blob| blob.content_type.as_str())
        .ok_or(AppError::MissingBlob)
}

/// `"1 file"` for exactly one record, `"<n> files"` otherwise (zero included).
pub fn file_count(files: &[UploadedFile]) -> String {
    if files.len() == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", files.len())
    }
}

/// True iff the content type's text before its first `/` is `image`.
/// A missing blob or content type coerces to the empty string, never an error.
pub fn is_image(file: &UploadedFile) -> bool {
    let content_type = file
        .blob
        .as_ref()
        .map(|blob| blob.content_type.as_str())
        .unwrap_or("");

    content_type.split('/').next().unwrap_or("") == "image"
}

/// True iff the content type is exactly `application/pdf`.
pub fn is_pdf(file: &UploadedFile) -> bool {
    file.blob
        .as_ref()
        .map(|blob| blob.content_type == mime::APPLICATION_PDF.essence_str())
        .unwrap_or(false)
}
