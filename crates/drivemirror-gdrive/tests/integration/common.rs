//! Shared test helpers for Drive API integration tests
//!
//! Each helper mounts mock endpoints on a wiremock server. Uploads are served
//! under `/upload`, matching `DriveClient::with_base_url`.

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivemirror_gdrive::client::DriveClient;

pub const TOKEN: &str = "test-access-token";
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Starts a mock server and returns a client pointing at it
pub async fn setup_drive_mock() -> (MockServer, DriveClient) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_url(TOKEN, server.uri());
    (server, client)
}

/// A Drive `File` resource
pub fn file_json(id: &str, name: &str, mime_type: &str) -> Value {
    json!({ "id": id, "name": name, "mimeType": mime_type })
}

/// Mounts a single-page `files.list` response for the exact `q` expression
pub async fn mount_listing(server: &MockServer, q: &str, files: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": files })))
        .mount(server)
        .await;
}

/// Mounts a media download for `id`
pub async fn mount_download(server: &MockServer, id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{id}")))
        .and(query_param("alt", "media"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

/// Mounts a Drive JSON error response for any request to `files_path`
#[allow(dead_code)]
pub async fn mount_error(server: &MockServer, http_method: &str, files_path: &str, status: u16) {
    Mock::given(method(http_method))
        .and(path(files_path))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": { "code": status, "message": "mock failure" }
        })))
        .mount(server)
        .await;
}
