//! Core use cases running against the Drive adapter
//!
//! Verifies that get-or-create and upsert issue the expected request
//! sequence: one lookup, then either a create or an in-place update.

use std::sync::Arc;

use drivemirror_core::domain::{EntryKind, ParentRef, RemoteId};
use drivemirror_core::ports::EntryQuery;
use drivemirror_core::usecases::{FileUpsert, FolderResolver, UpsertAction};
use drivemirror_gdrive::provider::DriveRemoteStore;
use drivemirror_gdrive::query::build_query;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::common::{self, file_json, FOLDER_MIME};

#[tokio::test]
async fn test_resolver_reuses_existing_folder() {
    let (server, client) = common::setup_drive_mock().await;
    let query = EntryQuery::named(ParentRef::Root, "Datos_YOLO").of_kind(EntryKind::Folder);
    common::mount_listing(
        &server,
        &build_query(&query),
        vec![file_json("yolo-1", "Datos_YOLO", FOLDER_MIME)],
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = FolderResolver::new(Arc::new(DriveRemoteStore::new(client)));
    let id = resolver.resolve("Datos_YOLO", &ParentRef::Root).await.unwrap();
    assert_eq!(id.as_str(), "yolo-1");
}

#[tokio::test]
async fn test_resolver_creates_missing_folder() {
    let (server, client) = common::setup_drive_mock().await;
    let query = EntryQuery::named(ParentRef::Root, "Mis_Datos_Analisis").of_kind(EntryKind::Folder);
    common::mount_listing(&server, &build_query(&query), vec![]).await;
    Mock::given(method("POST"))
        .and(path("/files"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(file_json("new-1", "Mis_Datos_Analisis", FOLDER_MIME)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = FolderResolver::new(Arc::new(DriveRemoteStore::new(client)));
    let id = resolver
        .resolve("Mis_Datos_Analisis", &ParentRef::Root)
        .await
        .unwrap();
    assert_eq!(id.as_str(), "new-1");
}

#[tokio::test]
async fn test_upsert_updates_existing_file_in_place() {
    let (server, client) = common::setup_drive_mock().await;
    let parent = RemoteId::new("emo-1".to_string()).unwrap();
    let query = EntryQuery::named(parent.clone(), "data.yaml").of_kind(EntryKind::File);
    common::mount_listing(
        &server,
        &build_query(&query),
        vec![file_json("yaml-1", "data.yaml", "application/x-yaml")],
    )
    .await;
    Mock::given(method("PATCH"))
        .and(path("/upload/files/yaml-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(file_json("yaml-1", "data.yaml", "application/x-yaml")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let upsert = FileUpsert::new(Arc::new(DriveRemoteStore::new(client)));
    let result = upsert
        .upsert(b"nc: 7", "data.yaml", &ParentRef::from(parent), None)
        .await
        .unwrap();
    assert_eq!(result.id.as_str(), "yaml-1");
    assert_eq!(result.action, UpsertAction::Updated);
}

#[tokio::test]
async fn test_transport_failure_maps_to_remote_unavailable() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_error(&server, "GET", "/files", 500).await;

    let resolver = FolderResolver::new(Arc::new(DriveRemoteStore::new(client)));
    let err = resolver.resolve("x", &ParentRef::Root).await.unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("Server error (500)"), "{err}");
}
