//! End-to-end tests of the HTTP surface over in-memory providers

mod common;

use http::StatusCode;
use serde_json::json;

use ::common::prelude::*;
use dataroom_daemon::http_server::api::v0::{access, auth, blobs, datarooms, files, folders};
use dataroom_daemon::http_server::api::v0::{SearchRequest, SearchResponse};

const PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

async fn signup(app: &axum::Router, handle: &str) -> UserProfile {
    common::call(
        app,
        "/api/v0/auth/signup",
        &auth::SignupRequest {
            full_name: handle.to_string(),
            email: format!("{}@example.com", handle),
            password: "pw".to_string(),
        },
    )
    .await
}

async fn create_room(app: &axum::Router, user: UserId, name: &str) -> DataroomView {
    common::call(
        app,
        "/api/v0/datarooms/create",
        &datarooms::CreateRequest {
            user_id: user,
            name: name.to_string(),
        },
    )
    .await
}

/// Ticket, bytes, record.
async fn upload(
    app: &axum::Router,
    user: UserId,
    dataroom: DataroomId,
    folder: Option<FolderId>,
    name: &str,
) -> FileRecord {
    let ticket: UploadTicket = common::call(
        app,
        "/api/v0/files/upload-url",
        &files::UploadUrlRequest { user_id: user },
    )
    .await;

    let (status, body) = common::post_bytes(app, ticket.url.path(), PDF).await;
    assert_eq!(status, StatusCode::OK);
    let uploaded: blobs::UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(uploaded.size, PDF.len() as u64);

    common::call(
        app,
        "/api/v0/files/create",
        &files::CreateRequest {
            user_id: user,
            dataroom_id: dataroom,
            folder_id: folder,
            name: name.to_string(),
            storage_ref: ticket.storage_ref,
            mime_type: "application/pdf".to_string(),
            size: uploaded.size,
        },
    )
    .await
}

#[tokio::test]
async fn test_signup_and_login() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;

    let logged_in: UserProfile = common::call(
        &app,
        "/api/v0/auth/login",
        &auth::LoginRequest {
            email: "alice@example.com".to_string(),
            password: "pw".to_string(),
        },
    )
    .await;
    assert_eq!(logged_in.id, alice.id);

    let (status, body) = common::post_json(
        &app,
        "/api/v0/auth/login",
        &json!({"email": "alice@example.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credentials");
    assert_eq!(body["msg"], "Invalid email or password");

    // the password never leaves the server
    let shown: auth::UserResponse =
        common::call(&app, "/api/v0/auth/user", &auth::UserRequest { user_id: alice.id }).await;
    let shown = serde_json::to_value(shown.user.unwrap()).unwrap();
    assert!(shown.get("password").is_none());
}

#[tokio::test]
async fn test_dataroom_lifecycle() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;

    let (status, body) = common::post_json(
        &app,
        "/api/v0/datarooms/create",
        &json!({"user_id": alice.id, "name": "Deals"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "owner");
    let room: DataroomView = serde_json::from_value(body).unwrap();

    // names are unique per owner regardless of case
    let (status, body) = common::post_json(
        &app,
        "/api/v0/datarooms/create",
        &json!({"user_id": alice.id, "name": "deals"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "duplicate_name");

    let renamed: Dataroom = common::call(
        &app,
        "/api/v0/datarooms/rename",
        &datarooms::RenameRequest {
            user_id: alice.id,
            dataroom_id: room.dataroom.id,
            name: "Deals 2025".to_string(),
        },
    )
    .await;
    assert_eq!(renamed.name, "Deals 2025");

    let listed: datarooms::ListResponse = common::call(
        &app,
        "/api/v0/datarooms/list",
        &datarooms::ListRequest { user_id: alice.id },
    )
    .await;
    assert_eq!(listed.datarooms.len(), 1);
    assert_eq!(listed.datarooms[0].dataroom.name, "Deals 2025");

    let report: CascadeReport = common::call(
        &app,
        "/api/v0/datarooms/delete",
        &datarooms::DeleteRequest {
            user_id: alice.id,
            dataroom_id: room.dataroom.id,
        },
    )
    .await;
    assert_eq!(report.grants, 1);

    let (status, body) = common::post_json(
        &app,
        "/api/v0/datarooms/get",
        &json!({"user_id": alice.id, "dataroom_id": room.dataroom.id}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "access_denied");
}

#[tokio::test]
async fn test_roles_gate_operations() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;

    let grant: AccessGrant = common::call(
        &app,
        "/api/v0/access/invite",
        &access::InviteRequest {
            user_id: alice.id,
            dataroom_id: room,
            email: bob.email.clone(),
            role: Role::Viewer,
        },
    )
    .await;

    // viewers read but cannot write
    let listed: folders::ListResponse = common::call(
        &app,
        "/api/v0/folders/list",
        &folders::ListRequest {
            user_id: bob.id,
            dataroom_id: room,
            parent_id: None,
        },
    )
    .await;
    assert!(listed.folders.is_empty());

    let (status, body) = common::post_json(
        &app,
        "/api/v0/folders/create",
        &json!({"user_id": bob.id, "dataroom_id": room, "name": "Q1"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "insufficient_permissions");

    let promoted: AccessGrant = common::call(
        &app,
        "/api/v0/access/role",
        &access::RoleRequest {
            user_id: alice.id,
            grant_id: grant.id,
            role: Role::Editor,
        },
    )
    .await;
    assert_eq!(promoted.role, Role::Editor);

    let folder: Folder = common::call(
        &app,
        "/api/v0/folders/create",
        &folders::CreateRequest {
            user_id: bob.id,
            dataroom_id: room,
            parent_id: None,
            name: "Q1".to_string(),
        },
    )
    .await;
    assert_eq!(folder.parent_folder_id, None);

    // owner can be neither demoted nor granted
    let owner_grant = common::call::<_, access::ListResponse>(
        &app,
        "/api/v0/access/list",
        &access::ListRequest {
            user_id: alice.id,
            dataroom_id: room,
        },
    )
    .await
    .grants
    .into_iter()
    .find(|g| g.role == Role::Owner)
    .unwrap();
    let (status, body) = common::post_json(
        &app,
        "/api/v0/access/remove",
        &json!({"user_id": alice.id, "grant_id": owner_grant.id}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "immutable_owner");

    let (status, body) = common::post_json(
        &app,
        "/api/v0/access/invite",
        &json!({"user_id": alice.id, "dataroom_id": room, "email": "c@x.com", "role": "owner"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_role");

    let removed: access::RemoveResponse = common::call(
        &app,
        "/api/v0/access/remove",
        &access::RemoveRequest {
            user_id: alice.id,
            grant_id: grant.id,
        },
    )
    .await;
    assert_eq!(removed.grant_id, grant.id);

    let check: access::CheckResponse = common::call(
        &app,
        "/api/v0/access/check",
        &access::CheckRequest {
            user_id: bob.id,
            dataroom_id: room,
        },
    )
    .await;
    assert_eq!(check.role, None);
}

#[tokio::test]
async fn test_upload_download_and_delete() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;

    let file = upload(&app, alice.id, room, None, "nda.pdf").await;
    assert_eq!(file.size, PDF.len() as u64);

    let url: files::UrlResponse = common::call(
        &app,
        "/api/v0/files/url",
        &files::UrlRequest {
            user_id: alice.id,
            file_id: file.id,
        },
    )
    .await;
    let url = url.url.unwrap();

    let (status, body) = common::get(&app, url.path()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, PDF);

    let deleted: files::DeleteResponse = common::call(
        &app,
        "/api/v0/files/delete",
        &files::DeleteRequest {
            user_id: alice.id,
            file_id: file.id,
        },
    )
    .await;
    assert_eq!(deleted.file_id, file.id);

    // content goes with the record
    let (status, _) = common::get(&app, url.path()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_uploaded_content_cannot_be_replaced() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;
    let _: AccessGrant = common::call(
        &app,
        "/api/v0/access/invite",
        &access::InviteRequest {
            user_id: alice.id,
            dataroom_id: room,
            email: bob.email.clone(),
            role: Role::Viewer,
        },
    )
    .await;

    let file = upload(&app, alice.id, room, None, "report.pdf").await;

    // a viewer can see the ref but not push new content to it
    let seen: FileRecord = common::call(
        &app,
        "/api/v0/files/get",
        &files::GetRequest {
            user_id: bob.id,
            file_id: file.id,
        },
    )
    .await;
    let path = format!("/api/v0/blobs/{}", seen.storage_ref);
    let (status, _) = common::post_bytes(&app, &path, b"EVIL").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = common::get(&app, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, PDF);
}

#[tokio::test]
async fn test_registering_a_used_storage_ref_conflicts() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;
    let file = upload(&app, alice.id, room, None, "report.pdf").await;

    let (status, body) = common::post_json(
        &app,
        "/api/v0/files/create",
        &json!({
            "user_id": alice.id,
            "dataroom_id": room,
            "name": "copy.pdf",
            "storage_ref": file.storage_ref,
            "mime_type": "application/pdf",
            "size": file.size,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "storage_ref_in_use");
}

#[tokio::test]
async fn test_blob_endpoints_reject_unknown_refs() {
    let (app, _) = common::app().await;
    let path = format!("/api/v0/blobs/{}", StorageRef::new());

    let (status, _) = common::post_bytes(&app, &path, PDF).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::get(&app, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_pdf_is_rejected() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;

    let ticket: UploadTicket = common::call(
        &app,
        "/api/v0/files/upload-url",
        &files::UploadUrlRequest { user_id: alice.id },
    )
    .await;

    let (status, body) = common::post_json(
        &app,
        "/api/v0/files/create",
        &json!({
            "user_id": alice.id,
            "dataroom_id": room,
            "name": "notes.txt",
            "storage_ref": ticket.storage_ref,
            "mime_type": "text/plain",
            "size": 12,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_mime_type");
    assert_eq!(body["msg"], "Only PDF files are supported");
}

#[tokio::test]
async fn test_folder_tree_and_search() {
    let (app, _) = common::app().await;
    let alice = signup(&app, "alice").await;
    let room = create_room(&app, alice.id, "Deals").await.dataroom.id;

    let q1: Folder = common::call(
        &app,
        "/api/v0/folders/create",
        &folders::CreateRequest {
            user_id: alice.id,
            dataroom_id: room,
            parent_id: None,
            name: "Q1".to_string(),
        },
    )
    .await;
    let reports: Folder = common::call(
        &app,
        "/api/v0/folders/create",
        &folders::CreateRequest {
            user_id: alice.id,
            dataroom_id: room,
            parent_id: Some(q1.id),
            name: "Reports".to_string(),
        },
    )
    .await;
    upload(&app, alice.id, room, Some(reports.id), "summary.pdf").await;

    let path: folders::PathResponse = common::call(
        &app,
        "/api/v0/folders/path",
        &folders::PathRequest {
            user_id: alice.id,
            dataroom_id: room,
            folder_id: reports.id,
        },
    )
    .await;
    let names: Vec<_> = path.path.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Q1", "Reports"]);

    let count: ItemCount = common::call(
        &app,
        "/api/v0/folders/count",
        &folders::CountRequest {
            user_id: alice.id,
            folder_id: q1.id,
        },
    )
    .await;
    assert_eq!((count.folders, count.files, count.total), (1, 0, 1));

    let found: SearchResponse =
        common::call(&app, "/api/v0/search", &SearchRequest { user_id: alice.id }).await;
    let matches = filter_results(found.results, "summary");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].path, "Deals > Q1 > Reports > summary.pdf");

    let report: CascadeReport = common::call(
        &app,
        "/api/v0/folders/delete",
        &folders::DeleteRequest {
            user_id: alice.id,
            folder_id: q1.id,
        },
    )
    .await;
    assert_eq!((report.folders, report.files), (2, 1));

    let all: folders::AllResponse = common::call(
        &app,
        "/api/v0/folders/all",
        &folders::AllRequest {
            user_id: alice.id,
            dataroom_id: room,
        },
    )
    .await;
    assert!(all.folders.is_empty());
}

#[tokio::test]
async fn test_status_and_fallback() {
    let (app, _) = common::app().await;

    let (status, _) = common::get(&app, "/_status/livez").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::get(&app, "/_status/readyz").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::get(&app, "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
