//! Google Drive API client
//!
//! Provides a typed HTTP client for the Drive v3 API. Handles the bearer
//! header, endpoint construction, pagination and status classification.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use drivemirror_gdrive::client::DriveClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DriveClient::new("access-token-here");
//! let files = client
//!     .list_files("'root' in parents and trashed=false")
//!     .await?;
//! println!("{} entries at the top level", files.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DriveError;

/// Base URL for Drive v3 metadata endpoints
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for Drive v3 media upload endpoints
pub const DRIVE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Fields requested for every file resource
const FILE_FIELDS: &str = "id,name,mimeType";

/// Page size for `files.list` (the API maximum)
const PAGE_SIZE: &str = "1000";

/// Prefix of the boundary used in `multipart/related` upload bodies
const MULTIPART_BOUNDARY_PREFIX: &str = "drivemirror-part-boundary-";

// ============================================================================
// Drive API resource types
// ============================================================================

/// The subset of a Drive `File` resource that drivemirror reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

/// One page of `files.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Metadata body for create requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewFileMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
    parents: [&'a str; 1],
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Drive API calls
///
/// Wraps `reqwest::Client` with the bearer token and both base URLs. Each
/// call is a single request (or one request per page); nothing is retried.
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata requests
    base_url: String,
    /// Base URL for media uploads
    upload_base_url: String,
    /// OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a new DriveClient against the public Drive endpoints
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token with a Drive scope
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, DRIVE_BASE_URL, DRIVE_UPLOAD_BASE_URL)
    }

    /// Creates a client that sends every request to `base_url` (useful for testing)
    ///
    /// Uploads go to `{base_url}/upload`.
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let upload_base_url = format!("{base_url}/upload");
        Self::with_base_urls(access_token, base_url, upload_base_url)
    }

    /// Creates a client with explicit metadata and upload base URLs
    pub fn with_base_urls(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_base_url: upload_base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates an authenticated request builder for a metadata endpoint
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g. "/files")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Creates an authenticated request builder for an upload endpoint
    pub fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Lists every file matching the `q` expression, following page tokens
    pub async fn list_files(&self, q: &str) -> Result<Vec<DriveFile>, DriveError> {
        let fields = format!("nextPageToken,files({FILE_FIELDS})");
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.request(Method::GET, "/files").query(&[
                ("q", q),
                ("fields", fields.as_str()),
                ("pageSize", PAGE_SIZE),
                ("spaces", "drive"),
            ]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let page: FileList = parse_json(send(req).await?).await?;
            debug!(q, page_len = page.files.len(), "files.list page");
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }

    /// Creates a folder under `parent_id` (`"root"` for the top level)
    pub async fn create_folder(&self, name: &str, parent_id: &str) -> Result<DriveFile, DriveError> {
        debug!(name, parent_id, "Creating folder");
        let metadata = NewFileMetadata {
            name,
            mime_type: drivemirror_core::domain::FOLDER_CONTENT_TYPE,
            parents: [parent_id],
        };
        let req = self
            .request(Method::POST, "/files")
            .query(&[("fields", FILE_FIELDS)])
            .json(&metadata);
        parse_json(send(req).await?).await
    }

    /// Creates a file with content in one `multipart/related` request
    pub async fn create_file(
        &self,
        name: &str,
        parent_id: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<DriveFile, DriveError> {
        debug!(name, parent_id, content_type, bytes = data.len(), "Creating file");
        let metadata = NewFileMetadata {
            name,
            mime_type: content_type,
            parents: [parent_id],
        };
        let metadata = serde_json::to_vec(&metadata)
            .map_err(|e| DriveError::InvalidResponse(format!("cannot encode metadata: {e}")))?;

        let boundary = multipart_boundary(&metadata, data);
        let req = self
            .upload_request(Method::POST, "/files")
            .query(&[("uploadType", "multipart"), ("fields", FILE_FIELDS)])
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(multipart_related_body(&boundary, &metadata, content_type, data));
        parse_json(send(req).await?).await
    }

    /// Replaces the content of an existing file, keeping its id
    pub async fn update_content(
        &self,
        file_id: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<DriveFile, DriveError> {
        debug!(file_id, content_type, bytes = data.len(), "Updating file content");
        let req = self
            .upload_request(Method::PATCH, &format!("/files/{file_id}"))
            .query(&[("uploadType", "media"), ("fields", FILE_FIELDS)])
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec());
        parse_json(send(req).await?).await
    }

    /// Downloads the content of a file
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, DriveError> {
        debug!(file_id, "Downloading file");
        let req = self
            .request(Method::GET, &format!("/files/{file_id}"))
            .query(&[("alt", "media")]);
        let bytes = send(req).await?.bytes().await?;
        debug!(file_id, bytes = bytes.len(), "Downloaded file");
        Ok(bytes.to_vec())
    }
}

/// Sends `req` and turns non-success statuses into [`DriveError`]
async fn send(req: RequestBuilder) -> Result<Response, DriveError> {
    let response = req.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let body = response.text().await.unwrap_or_default();
    Err(DriveError::from_status(status, retry_after, body))
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, DriveError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| DriveError::InvalidResponse(e.to_string()))
}

/// Assembles a two-part `multipart/related` body: JSON metadata, then media
fn multipart_related_body(
    boundary: &str,
    metadata: &[u8],
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(metadata.len() + data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata);
    body.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Picks a boundary whose delimiter line appears in neither part
fn multipart_boundary(metadata: &[u8], data: &[u8]) -> String {
    let contains = |haystack: &[u8], needle: &[u8]| {
        haystack.windows(needle.len()).any(|w| w == needle)
    };
    (0u32..)
        .map(|n| format!("{MULTIPART_BOUNDARY_PREFIX}{n:08x}"))
        .find(|b| {
            let delimiter = format!("--{b}");
            !contains(metadata, delimiter.as_bytes()) && !contains(data, delimiter.as_bytes())
        })
        .unwrap_or_else(|| MULTIPART_BOUNDARY_PREFIX.to_string())
}
