//! Shared fixtures for vault integration tests
#![allow(dead_code)]

use common::prelude::*;
use common::testkit::TestEnv;

/// Route vault logs to the test writer when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh environment with one user owning one dataroom called "Deals".
pub async fn setup_room() -> (TestEnv, UserProfile, DataroomId) {
    init_tracing();
    let env = TestEnv::new();
    let owner = env.user("alice").await.unwrap();
    let room = env
        .vault
        .create_dataroom(owner.id, "Deals")
        .await
        .unwrap();
    (env, owner, room.dataroom.id)
}

/// Sign up `handle` and grant them `role` on `dataroom`.
pub async fn member(
    env: &TestEnv,
    inviter: UserId,
    dataroom: DataroomId,
    handle: &str,
    role: Role,
) -> (UserProfile, AccessGrant) {
    let user = env.user(handle).await.unwrap();
    let grant = env
        .vault
        .invite_access(inviter, dataroom, &user.email, role)
        .await
        .unwrap();
    (user, grant)
}

/// Build `a/b/c/...` under the dataroom root, returning the folders
///  root first.
pub async fn folder_chain(
    env: &TestEnv,
    user: UserId,
    dataroom: DataroomId,
    names: &[&str],
) -> Vec<Folder> {
    let mut parent = None;
    let mut chain = Vec::new();
    for name in names {
        let folder = env
            .vault
            .create_folder(user, dataroom, parent, name)
            .await
            .unwrap();
        parent = Some(folder.id);
        chain.push(folder);
    }
    chain
}
