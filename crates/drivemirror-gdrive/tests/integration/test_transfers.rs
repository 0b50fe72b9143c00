//! Integration tests for creates, uploads and downloads

use drivemirror_core::domain::{ParentRef, RemoteId};
use drivemirror_core::ports::IRemoteStore;
use drivemirror_gdrive::provider::DriveRemoteStore;
use drivemirror_gdrive::DriveError;
use serde_json::json;
use wiremock::{
    matchers::{body_bytes, body_json, body_string_contains, header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{self, file_json, FOLDER_MIME};

// ============================================================================
// Download tests
// ============================================================================

#[tokio::test]
async fn test_download_returns_content() {
    let (server, client) = common::setup_drive_mock().await;
    let content = b"emotion,count\nhappy,12\n";
    common::mount_download(&server, "csv-001", content).await;

    let data = client.download("csv-001").await.expect("download failed");
    assert_eq!(data, content);
}

#[tokio::test]
async fn test_download_binary_content() {
    let (server, client) = common::setup_drive_mock().await;
    let content: Vec<u8> = (0..65_536).map(|i| (i % 256) as u8).collect();
    common::mount_download(&server, "img-001", &content).await;

    let store = DriveRemoteStore::new(client);
    let data = store
        .download_file(&RemoteId::new("img-001".to_string()).unwrap())
        .await
        .unwrap();
    assert_eq!(data, content);
}

#[tokio::test]
async fn test_download_missing_file_is_not_found() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_error(&server, "GET", "/files/gone", 404).await;

    let err = client.download("gone").await.unwrap_err();
    assert!(matches!(err, DriveError::NotFound(_)));
}

// ============================================================================
// Create tests
// ============================================================================

#[tokio::test]
async fn test_create_folder_posts_metadata() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_json(json!({
            "name": "train",
            "mimeType": FOLDER_MIME,
            "parents": ["parent-1"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("new-folder", "train", FOLDER_MIME)))
        .expect(1)
        .mount(&server)
        .await;

    let store = DriveRemoteStore::new(client);
    let parent = ParentRef::Folder(RemoteId::new("parent-1".to_string()).unwrap());
    let entry = store.create_folder("train", &parent).await.unwrap();

    assert_eq!(entry.id.as_str(), "new-folder");
    assert!(entry.is_folder());
}

#[tokio::test]
async fn test_create_folder_at_root_uses_alias() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_string_contains(r#""parents":["root"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("top", "Mis_Datos_Analisis", FOLDER_MIME)))
        .expect(1)
        .mount(&server)
        .await;

    let entry = client.create_folder("Mis_Datos_Analisis", "root").await.unwrap();
    assert_eq!(entry.id, "top");
}

#[tokio::test]
async fn test_create_file_sends_multipart_related() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .and(query_param("uploadType", "multipart"))
        .and(body_string_contains(r#""name":"data.yaml""#))
        .and(body_string_contains("Content-Type: application/x-yaml"))
        .and(body_string_contains("train: ./train"))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("file-9", "data.yaml", "application/x-yaml")))
        .expect(1)
        .mount(&server)
        .await;

    let store = DriveRemoteStore::new(client);
    let entry = store
        .create_file("data.yaml", &ParentRef::Root, "application/x-yaml", b"train: ./train")
        .await
        .unwrap();
    assert_eq!(entry.id.as_str(), "file-9");
    assert_eq!(entry.content_type, "application/x-yaml");
}

#[tokio::test]
async fn test_forbidden_create_is_classified() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_error(&server, "POST", "/upload/files", 403).await;

    let err = client
        .create_file("a.txt", "root", "text/plain", b"x")
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::Forbidden(_)));
    assert!(!err.is_transient());
}

// ============================================================================
// Update tests
// ============================================================================

#[tokio::test]
async fn test_update_content_patches_media() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("PATCH"))
        .and(path("/upload/files/file-1"))
        .and(query_param("uploadType", "media"))
        .and(header("content-type", "text/csv"))
        .and(body_bytes(b"a,b\n".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(file_json("file-1", "out.csv", "text/csv")))
        .expect(1)
        .mount(&server)
        .await;

    let store = DriveRemoteStore::new(client);
    let entry = store
        .update_file_content(&RemoteId::new("file-1".to_string()).unwrap(), "text/csv", b"a,b\n")
        .await
        .unwrap();
    assert_eq!(entry.id.as_str(), "file-1");
}
