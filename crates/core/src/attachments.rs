//! Task attachment validation and display helpers.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted attachment, in bytes (10 MiB).
pub const MAX_ATTACHMENT_SIZE_BYTES: i64 = 10 * 1024 * 1024;

/// Image MIME types accepted for upload.
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Document MIME types accepted for upload.
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "text/csv",
];

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn matches_any(list: &[&str], mime_type: &str) -> bool {
    let mime_type = mime_type.trim();
    list.iter().any(|m| m.eq_ignore_ascii_case(mime_type))
}

/// Whether the MIME type is one of the accepted image types.
pub fn is_image(mime_type: &str) -> bool {
    matches_any(IMAGE_MIME_TYPES, mime_type)
}

/// Whether the MIME type is one of the accepted document types.
pub fn is_document(mime_type: &str) -> bool {
    matches_any(DOCUMENT_MIME_TYPES, mime_type)
}

/// Whether the MIME type may be uploaded at all.
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    is_image(mime_type) || is_document(mime_type)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check an upload's MIME type and size before anything is persisted.
pub fn validate_attachment(mime_type: &str, file_size: i64) -> Result<(), CoreError> {
    if !is_allowed_mime_type(mime_type) {
        return Err(CoreError::invalid(format!(
            "File type '{mime_type}' is not allowed"
        )));
    }
    if file_size <= 0 {
        return Err(CoreError::invalid("File is empty"));
    }
    if file_size > MAX_ATTACHMENT_SIZE_BYTES {
        return Err(CoreError::invalid(format!(
            "File size {} exceeds the maximum of {}",
            format_file_size(file_size),
            format_file_size(MAX_ATTACHMENT_SIZE_BYTES)
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Human-readable size in binary units: `512 B`, `1.5 KB`, `10.0 MB`.
pub fn format_file_size(bytes: i64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes.max(0));
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", SIZE_UNITS[unit])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
