use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::ids::{DataroomId, FileId, FolderId, GrantId, StorageRef, UserId};
use crate::role::Role;

/// Current UTC time truncated to millisecond precision, so records survive a
///  round trip through any backing store unchanged.
pub fn timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds((now.nanosecond() % 1_000_000) as i64)
}

/// A registered user. The credential is an opaque string compared for
///  exact equality.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    /// Case-sensitive, unique across users.
    pub email: String,
    pub password: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A user as exposed to callers: everything but the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataroom {
    pub id: DataroomId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A dataroom together with the role the caller holds on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataroomView {
    #[serde(flatten)]
    pub dataroom: Dataroom,
    pub role: Role,
}

/// The (dataroom, email, role) authorization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub id: GrantId,
    pub dataroom_id: DataroomId,
    pub user_email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub invited_at: OffsetDateTime,
    pub invited_by: Option<UserId>,
}

impl AccessGrant {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub dataroom_id: DataroomId,
    /// `None` for folders at the dataroom root.
    pub parent_folder_id: Option<FolderId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    pub dataroom_id: DataroomId,
    /// `None` for files at the dataroom root.
    pub folder_id: Option<FolderId>,
    pub storage_ref: StorageRef,
    pub mime_type: String,
    pub size: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One step of a breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub id: FolderId,
    pub name: String,
}

impl From<&Folder> for Crumb {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name.clone(),
        }
    }
}

/// Direct children of a folder or dataroom root. Not recursive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemCount {
    pub folders: usize,
    pub files: usize,
    pub total: usize,
}

impl ItemCount {
    pub fn new(folders: usize, files: usize) -> Self {
        Self {
            folders,
            files,
            total: folders + files,
        }
    }
}
