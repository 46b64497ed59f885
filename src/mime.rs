// src/mime.rs
//! Static extension → MIME type lookup for file metadata

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::consts::DEFAULT_MIME_TYPE;

static MIME_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("txt", "text/plain"),
        ("md", "text/markdown"),
        ("html", "text/html"),
        ("css", "text/css"),
        ("csv", "text/csv"),
        ("js", "text/javascript"),
        ("json", "application/json"),
        ("xml", "application/xml"),
        ("pdf", "application/pdf"),
        ("doc", "application/msword"),
        (
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        ("xls", "application/vnd.ms-excel"),
        (
            "xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        ("zip", "application/zip"),
        ("gz", "application/gzip"),
        ("tar", "application/x-tar"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("svg", "image/svg+xml"),
        ("webp", "image/webp"),
        ("mp3", "audio/mpeg"),
        ("wav", "audio/wav"),
        ("mp4", "video/mp4"),
        ("webm", "video/webm"),
    ])
});

/// MIME type for a path, by lowercase extension. Falls back to a generic
/// binary type when the extension is unknown or absent.
pub fn mime_for_path<P: AsRef<Path>>(path: P) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| MIME_TYPES.get(ext.as_str()).copied())
        .unwrap_or(DEFAULT_MIME_TYPE)
}
