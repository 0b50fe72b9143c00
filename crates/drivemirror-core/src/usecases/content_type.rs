//! Content-type inference from file names
//!
//! Maps a file extension to the MIME type sent with uploads. Unknown
//! extensions fall back to [`DEFAULT_CONTENT_TYPE`]; the fallback is
//! logged by the caller, never treated as an error.

use crate::domain::entry::extension_of;

/// Generic binary type used when inference fails
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Infers a MIME type from the extension of `name`
///
/// Returns `None` if the name has no extension or the extension is unknown.
pub fn infer_content_type(name: &str) -> Option<&'static str> {
    let ext = extension_of(name)?;
    let mime = match ext.as_str() {
        // images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        // text and data
        "txt" | "cfg" | "log" => "text/plain",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "json" => "application/json",
        "yaml" | "yml" => "application/x-yaml",
        "xml" => "application/xml",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        // documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        // model weights
        "pt" | "onnx" => DEFAULT_CONTENT_TYPE,
        _ => return None,
    };
    Some(mime)
}
