//! Integration tests for folder listing
//!
//! Covers query construction, pagination, authentication headers and error
//! classification of `files.list`.

use drivemirror_core::domain::{EntryKind, ParentRef, RemoteId};
use drivemirror_core::ports::{EntryQuery, IRemoteStore};
use drivemirror_gdrive::provider::DriveRemoteStore;
use drivemirror_gdrive::query::build_query;
use drivemirror_gdrive::DriveError;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{self, file_json, FOLDER_MIME, TOKEN};

#[tokio::test]
async fn test_list_root_children() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_listing(
        &server,
        "'root' in parents and trashed=false",
        vec![
            file_json("f1", "Datos_YOLO", FOLDER_MIME),
            file_json("f2", "notes.txt", "text/plain"),
        ],
    )
    .await;

    let store = DriveRemoteStore::new(client);
    let entries = store
        .list_entries(&EntryQuery::children_of(ParentRef::Root))
        .await
        .expect("listing failed");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::Folder);
    assert_eq!(entries[1].kind, EntryKind::File);
    assert_eq!(entries[1].content_type, "text/plain");
}

#[tokio::test]
async fn test_list_sends_bearer_token_and_fields() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(query_param("fields", "nextPageToken,files(id,name,mimeType)"))
        .and(query_param("spaces", "drive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "files": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let files = client
        .list_files("'root' in parents and trashed=false")
        .await
        .unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_named_folder_query_reaches_server() {
    let (server, client) = common::setup_drive_mock().await;
    let parent = RemoteId::new("parent-1".to_string()).unwrap();
    let query = EntryQuery::named(parent, "Emotions").of_kind(EntryKind::Folder);
    common::mount_listing(
        &server,
        &build_query(&query),
        vec![file_json("emo-1", "Emotions", FOLDER_MIME)],
    )
    .await;

    let entries = DriveRemoteStore::new(client)
        .list_entries(&query)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id.as_str(), "emo-1");
}

#[tokio::test]
async fn test_list_follows_page_tokens() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [file_json("c", "c.jpg", "image/jpeg")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                file_json("a", "a.jpg", "image/jpeg"),
                file_json("b", "b.jpg", "image/jpeg")
            ],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let files = client
        .list_files("'root' in parents and trashed=false")
        .await
        .unwrap();
    let ids: Vec<_> = files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_unauthorized_is_classified() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_error(&server, "GET", "/files", 401).await;

    let err = client
        .list_files("'root' in parents and trashed=false")
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Unauthorized(_)));
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let err = client.list_files("x").await.unwrap_err();
    match err {
        DriveError::TooManyRequests { retry_after } => {
            assert_eq!(retry_after.map(|d| d.as_secs()), Some(12));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.list_files("x").await.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_server_error_surfaces_through_port_with_context() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_error(&server, "GET", "/files", 503).await;

    let err = DriveRemoteStore::new(client)
        .list_entries(&EntryQuery::children_of(ParentRef::Root))
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to list children of root"), "{message}");
    assert!(message.contains("503"), "{message}");
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.list_files("x").await.unwrap_err();
    assert!(matches!(err, DriveError::InvalidResponse(_)));
}
