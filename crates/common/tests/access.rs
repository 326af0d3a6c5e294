//! Integration tests for grants and the access guard

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn test_create_dataroom_grants_single_owner() {
    let (env, alice, room) = common::setup_room().await;

    let grants = env.vault.list_access(alice.id, room).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].role, Role::Owner);
    assert_eq!(grants[0].user_email, alice.email);
    assert_eq!(grants[0].invited_by, None);

    let role = env.vault.check_access(alice.id, room).await.unwrap();
    assert_eq!(role, Some(Role::Owner));
}

#[tokio::test]
async fn test_owner_grant_is_immutable() {
    let (env, alice, room) = common::setup_room().await;
    let owner_grant = env.vault.list_access(alice.id, room).await.unwrap()[0].clone();

    let result = env
        .vault
        .update_access_role(alice.id, owner_grant.id, Role::Viewer)
        .await;
    assert!(matches!(result, Err(VaultError::ImmutableOwner)));

    let result = env.vault.remove_access(alice.id, owner_grant.id).await;
    assert!(matches!(result, Err(VaultError::ImmutableOwner)));

    // an admin cannot touch it either
    let (bob, _) = common::member(&env, alice.id, room, "bob", Role::Admin).await;
    let result = env.vault.remove_access(bob.id, owner_grant.id).await;
    assert!(matches!(result, Err(VaultError::ImmutableOwner)));

    assert_eq!(
        env.vault.check_access(alice.id, room).await.unwrap(),
        Some(Role::Owner)
    );
}

#[tokio::test]
async fn test_invite_duplicate_email_fails() {
    let (env, alice, room) = common::setup_room().await;

    env.vault
        .invite_access(alice.id, room, "b@x.com", Role::Viewer)
        .await
        .unwrap();
    let result = env
        .vault
        .invite_access(alice.id, room, "b@x.com", Role::Editor)
        .await;
    assert!(matches!(result, Err(VaultError::DuplicateAccess)));

    // the owner's own email counts as present
    let result = env
        .vault
        .invite_access(alice.id, room, &alice.email, Role::Admin)
        .await;
    assert!(matches!(result, Err(VaultError::DuplicateAccess)));
}

#[tokio::test]
async fn test_invite_distinct_emails_listed_once_each() {
    let (env, alice, room) = common::setup_room().await;
    let emails = ["b@x.com", "c@x.com", "d@x.com"];
    for email in emails {
        env.vault
            .invite_access(alice.id, room, email, Role::Viewer)
            .await
            .unwrap();
    }

    let grants = env.vault.list_access(alice.id, room).await.unwrap();
    assert_eq!(grants.len(), 4);
    for email in emails {
        assert_eq!(grants.iter().filter(|g| g.user_email == email).count(), 1);
    }
}

#[tokio::test]
async fn test_invite_cannot_grant_owner() {
    let (env, alice, room) = common::setup_room().await;
    let result = env
        .vault
        .invite_access(alice.id, room, "b@x.com", Role::Owner)
        .await;
    assert!(matches!(result, Err(VaultError::InvalidRole(Role::Owner))));

    let (_, grant) = common::member(&env, alice.id, room, "bob", Role::Viewer).await;
    let result = env
        .vault
        .update_access_role(alice.id, grant.id, Role::Owner)
        .await;
    assert!(matches!(result, Err(VaultError::InvalidRole(Role::Owner))));
}

#[tokio::test]
async fn test_access_management_requires_admin() {
    let (env, alice, room) = common::setup_room().await;
    let (editor, editor_grant) = common::member(&env, alice.id, room, "bob", Role::Editor).await;
    let (admin, _) = common::member(&env, alice.id, room, "carol", Role::Admin).await;

    let result = env
        .vault
        .invite_access(editor.id, room, "d@x.com", Role::Viewer)
        .await;
    assert!(matches!(
        result,
        Err(VaultError::InsufficientPermissions {
            held: Role::Editor,
            required: Role::Admin
        })
    ));
    assert!(matches!(
        env.vault.list_access(editor.id, room).await,
        Err(VaultError::InsufficientPermissions { .. })
    ));

    let updated = env
        .vault
        .update_access_role(admin.id, editor_grant.id, Role::Viewer)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Viewer);
    assert_eq!(
        env.vault.check_access(editor.id, room).await.unwrap(),
        Some(Role::Viewer)
    );
}

#[tokio::test]
async fn test_guard_failure_modes() {
    let (env, alice, room) = common::setup_room().await;
    let stranger = env.user("mallory").await.unwrap();

    let result = env.vault.authorize(UserId::new(), room, None).await;
    assert!(matches!(result, Err(VaultError::UserNotFound)));

    let result = env.vault.authorize(stranger.id, room, None).await;
    assert!(matches!(result, Err(VaultError::AccessDenied)));

    let (viewer, _) = common::member(&env, alice.id, room, "bob", Role::Viewer).await;
    let result = env
        .vault
        .create_folder(viewer.id, room, None, "Q1")
        .await;
    assert!(matches!(
        result,
        Err(VaultError::InsufficientPermissions { .. })
    ));

    let grant = env.vault.authorize(viewer.id, room, None).await.unwrap();
    assert_eq!(grant.role, Role::Viewer);
}

#[tokio::test]
async fn test_check_access_never_errors() {
    let (env, _alice, room) = common::setup_room().await;
    let stranger = env.user("mallory").await.unwrap();

    assert_eq!(env.vault.check_access(UserId::new(), room).await.unwrap(), None);
    assert_eq!(env.vault.check_access(stranger.id, room).await.unwrap(), None);
    assert_eq!(
        env.vault
            .check_access(stranger.id, DataroomId::new())
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_update_and_remove_missing_grant() {
    let (env, alice, _room) = common::setup_room().await;
    let missing = GrantId::new();

    assert!(matches!(
        env.vault
            .update_access_role(alice.id, missing, Role::Viewer)
            .await,
        Err(VaultError::NotFound(_))
    ));
    assert!(matches!(
        env.vault.remove_access(alice.id, missing).await,
        Err(VaultError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invite_sends_notice_in_background() {
    let (env, alice, room) = common::setup_room().await;
    env.vault
        .invite_access(alice.id, room, "b@x.com", Role::Editor)
        .await
        .unwrap();

    let notices = env.notifier.wait_for(1).await;
    assert_eq!(notices.len(), 1);
    let notice = &notices[0];
    assert_eq!(notice.to_email, "b@x.com");
    assert_eq!(notice.dataroom_name, "Deals");
    assert_eq!(notice.inviter_email, alice.email);
    assert_eq!(notice.role, Role::Editor);
}

#[tokio::test]
async fn test_list_my_datarooms_with_roles() {
    let (env, alice, room) = common::setup_room().await;
    let other = env.vault.create_dataroom(alice.id, "Board").await.unwrap();
    let (bob, _) = common::member(&env, alice.id, room, "bob", Role::Viewer).await;

    let mine = env.vault.list_my_datarooms(alice.id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|v| v.role == Role::Owner));

    let theirs = env.vault.list_my_datarooms(bob.id).await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].dataroom.id, room);
    assert_eq!(theirs[0].role, Role::Viewer);
    assert!(theirs.iter().all(|v| v.dataroom.id != other.dataroom.id));
}
