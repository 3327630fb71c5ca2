//! Filesystem helpers: data directory resolution and reading upload files.

use std::path::{Path, PathBuf};

use laws_core::documents::UploadFile;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LAWS_DATA_DIR` environment variable
/// 2. `~/.laws`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LAWS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".laws");
    }

    // Last resort: current directory
    PathBuf::from(".laws")
}

/// Read a file from disk into an [`UploadFile`], guessing its content type.
pub async fn read_upload(path: &Path) -> Result<UploadFile, std::io::Error> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = detect_mime(&file_name);

    Ok(UploadFile {
        file_name,
        content_type: Some(content_type),
        bytes,
    })
}

/// Detect MIME type from file extension.
pub fn detect_mime(filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "xml" => "text/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "rtf" => "application/rtf",
        "odt" => "application/vnd.oasis.opendocument.text",
        _ => "application/octet-stream",
    }
    .to_string()
}
