mod memory;

pub use memory::{MemoryStore, MemoryStoreError};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::ids::{DataroomId, FileId, FolderId, GrantId, StorageRef, UserId};
use crate::model::{AccessGrant, Dataroom, FileRecord, Folder, User};
use crate::role::Role;

// NOTE: the store holds no uniqueness constraints beyond primary keys.
//  Name and email uniqueness are enforced by the vault with a
//  read-then-write check, so two racing writers may both succeed.

/// Persistence for every record the vault manages.
///
/// Implementations must:
/// * return listings in insertion order
/// * treat `None` parent / folder filters as "at the dataroom root",
///   never as "any"
/// * make deletes of missing records a no-op
#[async_trait]
pub trait Store: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    // users

    async fn insert_user(&self, user: User) -> Result<(), Self::Error>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>, Self::Error>;

    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error>;

    // datarooms

    /// Insert a dataroom together with its owner grant. Either both
    ///  records become visible or neither does.
    async fn insert_dataroom_with_owner(
        &self,
        dataroom: Dataroom,
        owner: AccessGrant,
    ) -> Result<(), Self::Error>;

    async fn get_dataroom(&self, id: DataroomId) -> Result<Option<Dataroom>, Self::Error>;

    async fn rename_dataroom(
        &self,
        id: DataroomId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error>;

    async fn delete_dataroom(&self, id: DataroomId) -> Result<(), Self::Error>;

    // access grants

    async fn insert_grant(&self, grant: AccessGrant) -> Result<(), Self::Error>;

    async fn get_grant(&self, id: GrantId) -> Result<Option<AccessGrant>, Self::Error>;

    /// The grant for `email` on `dataroom`, if any.
    async fn find_grant(
        &self,
        dataroom: DataroomId,
        email: &str,
    ) -> Result<Option<AccessGrant>, Self::Error>;

    async fn list_grants_for_user(&self, email: &str) -> Result<Vec<AccessGrant>, Self::Error>;

    async fn list_grants_for_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<AccessGrant>, Self::Error>;

    async fn set_grant_role(&self, id: GrantId, role: Role) -> Result<(), Self::Error>;

    async fn delete_grant(&self, id: GrantId) -> Result<(), Self::Error>;

    // folders

    async fn insert_folder(&self, folder: Folder) -> Result<(), Self::Error>;

    async fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, Self::Error>;

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error>;

    async fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error>;

    /// Folders of `dataroom` whose parent is exactly `parent`.
    async fn list_folders(
        &self,
        dataroom: DataroomId,
        parent: Option<FolderId>,
    ) -> Result<Vec<Folder>, Self::Error>;

    /// Direct subfolders of `parent`, whatever dataroom they claim.
    async fn list_child_folders(&self, parent: FolderId) -> Result<Vec<Folder>, Self::Error>;

    async fn list_folders_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<Folder>, Self::Error>;

    // files

    async fn insert_file(&self, file: FileRecord) -> Result<(), Self::Error>;

    async fn get_file(&self, id: FileId) -> Result<Option<FileRecord>, Self::Error>;

    /// The file record backed by `storage_ref`, if any.
    async fn find_file_by_storage_ref(
        &self,
        storage_ref: StorageRef,
    ) -> Result<Option<FileRecord>, Self::Error>;

    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error>;

    async fn delete_file(&self, id: FileId) -> Result<(), Self::Error>;

    /// Files of `dataroom` whose folder is exactly `folder`.
    async fn list_files(
        &self,
        dataroom: DataroomId,
        folder: Option<FolderId>,
    ) -> Result<Vec<FileRecord>, Self::Error>;

    async fn list_files_in_folder(&self, folder: FolderId) -> Result<Vec<FileRecord>, Self::Error>;

    async fn list_files_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<FileRecord>, Self::Error>;
}
