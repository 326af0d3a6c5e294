//! Integration tests for the folder/file tree

mod common;

use ::common::names::NameError;
use ::common::prelude::*;
use ::common::testkit::PDF_BYTES;
use ::common::vault::Entity;

#[tokio::test]
async fn test_duplicate_folder_names() {
    let (env, alice, room) = common::setup_room().await;
    let vault = &env.vault;

    let q1 = vault.create_folder(alice.id, room, None, "Q1").await.unwrap();
    let result = vault.create_folder(alice.id, room, None, "Q1").await;
    assert!(matches!(
        result,
        Err(VaultError::DuplicateName(Entity::Folder))
    ));

    // same name under a different parent is fine
    let nested = vault
        .create_folder(alice.id, room, Some(q1.id), "Q1")
        .await
        .unwrap();
    assert_eq!(nested.parent_folder_id, Some(q1.id));

    // and in another dataroom
    let other = vault.create_dataroom(alice.id, "Board").await.unwrap();
    vault
        .create_folder(alice.id, other.dataroom.id, None, "Q1")
        .await
        .unwrap();

    // names compare exactly
    vault.create_folder(alice.id, room, None, "q1").await.unwrap();
}

#[tokio::test]
async fn test_rename_folder_checks_siblings_only() {
    let (env, alice, room) = common::setup_room().await;
    let vault = &env.vault;

    let a = vault.create_folder(alice.id, room, None, "A").await.unwrap();
    vault.create_folder(alice.id, room, None, "B").await.unwrap();
    vault
        .create_folder(alice.id, room, Some(a.id), "C")
        .await
        .unwrap();

    let result = vault.rename_folder(alice.id, a.id, "B").await;
    assert!(matches!(result, Err(VaultError::DuplicateName(_))));

    // renaming to its own name is not a collision
    vault.rename_folder(alice.id, a.id, "A").await.unwrap();

    let renamed = vault.rename_folder(alice.id, a.id, "C").await.unwrap();
    assert_eq!(renamed.name, "C");
    assert_eq!(renamed.parent_folder_id, None);

    let result = vault.rename_folder(alice.id, FolderId::new(), "X").await;
    assert!(matches!(result, Err(VaultError::NotFound(Entity::Folder))));
}

#[tokio::test]
async fn test_invalid_names_rejected() {
    let (env, alice, room) = common::setup_room().await;

    let result = env.vault.create_folder(alice.id, room, None, "  ").await;
    assert!(matches!(
        result,
        Err(VaultError::InvalidName(NameError::Empty))
    ));

    let result = env.vault.create_folder(alice.id, room, None, "a:b").await;
    assert!(matches!(
        result,
        Err(VaultError::InvalidName(NameError::InvalidCharacters))
    ));

    let long = "x".repeat(256);
    let result = env.vault.rename_dataroom(alice.id, room, &long).await;
    assert!(matches!(
        result,
        Err(VaultError::InvalidName(NameError::TooLong))
    ));
}

#[tokio::test]
async fn test_create_folder_under_missing_parent() {
    let (env, alice, room) = common::setup_room().await;
    let result = env
        .vault
        .create_folder(alice.id, room, Some(FolderId::new()), "orphan")
        .await;
    assert!(matches!(result, Err(VaultError::NotFound(Entity::Folder))));

    // a parent in another dataroom does not count either
    let other = env.vault.create_dataroom(alice.id, "Board").await.unwrap();
    let foreign = env
        .vault
        .create_folder(alice.id, other.dataroom.id, None, "Minutes")
        .await
        .unwrap();
    let result = env
        .vault
        .create_folder(alice.id, room, Some(foreign.id), "sneaky")
        .await;
    assert!(matches!(result, Err(VaultError::NotFound(Entity::Folder))));
}

#[tokio::test]
async fn test_list_children_by_location() {
    let (env, alice, room) = common::setup_room().await;
    let chain = common::folder_chain(&env, alice.id, room, &["A", "B"]).await;
    env.upload_pdf(alice.id, room, None, "root.pdf").await.unwrap();
    env.upload_pdf(alice.id, room, Some(chain[0].id), "a.pdf")
        .await
        .unwrap();

    let root_folders = env.vault.list_folders(alice.id, room, None).await.unwrap();
    assert_eq!(root_folders.len(), 1);
    assert_eq!(root_folders[0].name, "A");

    let root_files = env.vault.list_files(alice.id, room, None).await.unwrap();
    assert_eq!(root_files.len(), 1);
    assert_eq!(root_files[0].name, "root.pdf");

    let in_a = env
        .vault
        .list_files(alice.id, room, Some(chain[0].id))
        .await
        .unwrap();
    assert_eq!(in_a.len(), 1);
    assert_eq!(in_a[0].name, "a.pdf");

    let all = env.vault.list_all_folders(alice.id, room).await.unwrap();
    let names: Vec<&str> = all.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
}

#[tokio::test]
async fn test_create_file_round_trip() {
    let (env, alice, room) = common::setup_room().await;
    let ticket = env.vault.generate_upload_url(alice.id).await.unwrap();
    env.blobs
        .put(ticket.storage_ref, PDF_BYTES.to_vec())
        .unwrap();

    let created = env
        .vault
        .create_file(
            alice.id,
            room,
            NewFile {
                name: "report.pdf".to_string(),
                folder_id: None,
                storage_ref: ticket.storage_ref,
                mime_type: "application/pdf".to_string(),
                size: 2048,
            },
        )
        .await
        .unwrap();

    let fetched = env.vault.get_file(alice.id, created.id).await.unwrap();
    assert_eq!(fetched.storage_ref, ticket.storage_ref);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_file_rejects_storage_ref_of_another_file() {
    let (env, alice, deals) = common::setup_room().await;
    let secret = env.upload_pdf(alice.id, deals, None, "secret.pdf").await.unwrap();

    // a viewer on Deals tries to adopt its content in a room they own
    let (mallory, _) = common::member(&env, alice.id, deals, "mallory", Role::Viewer).await;
    let mine = env
        .vault
        .create_dataroom(mallory.id, "Mine")
        .await
        .unwrap()
        .dataroom
        .id;
    let result = env
        .vault
        .create_file(
            mallory.id,
            mine,
            NewFile {
                name: "stolen.pdf".to_string(),
                folder_id: None,
                storage_ref: secret.storage_ref,
                mime_type: "application/pdf".to_string(),
                size: secret.size,
            },
        )
        .await;
    assert!(matches!(result, Err(VaultError::StorageRefInUse)));
    assert!(env.vault.list_files(mallory.id, mine, None).await.unwrap().is_empty());
    assert!(env.blob_exists(&secret).await.unwrap());
    assert!(env
        .vault
        .file_download_url(alice.id, secret.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_create_file_requires_uploaded_content() {
    let (env, alice, room) = common::setup_room().await;
    let ticket = env.vault.generate_upload_url(alice.id).await.unwrap();

    let result = env
        .vault
        .create_file(
            alice.id,
            room,
            NewFile {
                name: "empty.pdf".to_string(),
                folder_id: None,
                storage_ref: ticket.storage_ref,
                mime_type: "application/pdf".to_string(),
                size: 0,
            },
        )
        .await;
    assert!(matches!(result, Err(VaultError::NotFound(Entity::Upload))));
}

#[tokio::test]
async fn test_create_file_rejects_non_pdf() {
    let (env, alice, room) = common::setup_room().await;
    let ticket = env.vault.generate_upload_url(alice.id).await.unwrap();

    let result = env
        .vault
        .create_file(
            alice.id,
            room,
            NewFile {
                name: "photo.png".to_string(),
                folder_id: None,
                storage_ref: ticket.storage_ref,
                mime_type: "image/png".to_string(),
                size: 10,
            },
        )
        .await;
    assert!(matches!(result, Err(VaultError::InvalidMimeType(m)) if m == "image/png"));

    let files = env.vault.list_files(alice.id, room, None).await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_duplicate_and_rename_files() {
    let (env, alice, room) = common::setup_room().await;
    let a = env.upload_pdf(alice.id, room, None, "a.pdf").await.unwrap();
    env.upload_pdf(alice.id, room, None, "b.pdf").await.unwrap();

    let result = env.upload_pdf(alice.id, room, None, "a.pdf").await;
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<VaultError>(),
        Some(VaultError::DuplicateName(Entity::File))
    ));

    let result = env.vault.rename_file(alice.id, a.id, "b.pdf").await;
    assert!(matches!(result, Err(VaultError::DuplicateName(_))));

    let renamed = env.vault.rename_file(alice.id, a.id, "final").await.unwrap();
    assert_eq!(renamed.name, "final");
    assert_eq!(renamed.mime_type, "application/pdf");
}

#[tokio::test]
async fn test_delete_single_file_releases_blob() {
    let (env, alice, room) = common::setup_room().await;
    let file = env.upload_pdf(alice.id, room, None, "a.pdf").await.unwrap();
    assert!(env.blob_exists(&file).await.unwrap());

    let url = env
        .vault
        .file_download_url(alice.id, file.id)
        .await
        .unwrap();
    assert!(url.is_some());

    env.vault.delete_file(alice.id, file.id).await.unwrap();
    assert!(!env.blob_exists(&file).await.unwrap());
    assert!(matches!(
        env.vault.get_file(alice.id, file.id).await,
        Err(VaultError::NotFound(Entity::File))
    ));
}

#[tokio::test]
async fn test_breadcrumb_three_levels() {
    let (env, alice, room) = common::setup_room().await;
    let chain = common::folder_chain(&env, alice.id, room, &["A", "B", "C"]).await;

    let path = env
        .vault
        .breadcrumb_path(alice.id, room, chain[2].id)
        .await
        .unwrap();
    let names: Vec<&str> = path.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(path[0].id, chain[0].id);

    let root = env
        .vault
        .breadcrumb_path(alice.id, room, chain[0].id)
        .await
        .unwrap();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "A");
}

#[tokio::test]
async fn test_breadcrumb_stops_at_other_dataroom() {
    let (env, alice, room) = common::setup_room().await;
    let chain = common::folder_chain(&env, alice.id, room, &["A"]).await;
    let other = env.vault.create_dataroom(alice.id, "Board").await.unwrap();

    let path = env
        .vault
        .breadcrumb_path(alice.id, other.dataroom.id, chain[0].id)
        .await
        .unwrap();
    assert!(path.is_empty());
}

#[tokio::test]
async fn test_get_folder_checks_dataroom() {
    let (env, alice, room) = common::setup_room().await;
    let chain = common::folder_chain(&env, alice.id, room, &["A"]).await;
    let other = env.vault.create_dataroom(alice.id, "Board").await.unwrap();

    let folder = env
        .vault
        .get_folder(alice.id, room, chain[0].id)
        .await
        .unwrap();
    assert_eq!(folder.name, "A");

    let result = env
        .vault
        .get_folder(alice.id, other.dataroom.id, chain[0].id)
        .await;
    assert!(matches!(result, Err(VaultError::NotFound(Entity::Folder))));
}

#[tokio::test]
async fn test_item_count_is_shallow() {
    let (env, alice, room) = common::setup_room().await;
    let chain = common::folder_chain(&env, alice.id, room, &["A", "B", "C"]).await;
    env.upload_pdf(alice.id, room, Some(chain[0].id), "a.pdf")
        .await
        .unwrap();
    env.upload_pdf(alice.id, room, Some(chain[1].id), "b.pdf")
        .await
        .unwrap();

    let count = env
        .vault
        .folder_item_count(alice.id, chain[0].id)
        .await
        .unwrap();
    assert_eq!(count, ItemCount::new(1, 1));
    assert_eq!(count.total, 2);

    env.upload_pdf(alice.id, room, None, "root.pdf").await.unwrap();
    let count = env.vault.dataroom_item_count(alice.id, room).await.unwrap();
    assert_eq!(count, ItemCount::new(1, 1));
}

#[tokio::test]
async fn test_dataroom_names_unique_per_owner_ignoring_case() {
    let (env, alice, _room) = common::setup_room().await;
    let result = env.vault.create_dataroom(alice.id, "DEALS").await;
    assert!(matches!(
        result,
        Err(VaultError::DuplicateName(Entity::Dataroom))
    ));

    // another owner may reuse it
    let bob = env.user("bob").await.unwrap();
    env.vault.create_dataroom(bob.id, "Deals").await.unwrap();
}

#[tokio::test]
async fn test_editor_can_rename_dataroom_viewer_cannot() {
    let (env, alice, room) = common::setup_room().await;
    let (editor, _) = common::member(&env, alice.id, room, "bob", Role::Editor).await;
    let (viewer, _) = common::member(&env, alice.id, room, "carol", Role::Viewer).await;

    let renamed = env
        .vault
        .rename_dataroom(editor.id, room, "Deals 2026")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Deals 2026");

    let result = env.vault.rename_dataroom(viewer.id, room, "Mine").await;
    assert!(matches!(
        result,
        Err(VaultError::InsufficientPermissions { .. })
    ));

    let view = env.vault.get_dataroom(viewer.id, room).await.unwrap();
    assert_eq!(view.dataroom.name, "Deals 2026");
    assert_eq!(view.role, Role::Viewer);
}
