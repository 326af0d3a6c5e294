use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::Store;
use crate::ids::{DataroomId, FileId, FolderId, GrantId, StorageRef, UserId};
use crate::model::{AccessGrant, Dataroom, FileRecord, Folder, User};
use crate::role::Role;

/// In-memory document store. Each table is a `Vec` so listings come
///  back in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    users: Vec<User>,
    datarooms: Vec<Dataroom>,
    grants: Vec<AccessGrant>,
    folders: Vec<Folder>,
    files: Vec<FileRecord>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>, MemoryStoreError> {
        self.inner.read().map_err(|e| {
            MemoryStoreError::Internal(format!("failed to acquire read lock: {}", e))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>, MemoryStoreError> {
        self.inner.write().map_err(|e| {
            MemoryStoreError::Internal(format!("failed to acquire write lock: {}", e))
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Error = MemoryStoreError;

    async fn insert_user(&self, user: User) -> Result<(), Self::Error> {
        self.write()?.users.push(user);
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, Self::Error> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_dataroom_with_owner(
        &self,
        dataroom: Dataroom,
        owner: AccessGrant,
    ) -> Result<(), Self::Error> {
        // single write guard, so both land together
        let mut inner = self.write()?;
        inner.datarooms.push(dataroom);
        inner.grants.push(owner);
        Ok(())
    }

    async fn get_dataroom(&self, id: DataroomId) -> Result<Option<Dataroom>, Self::Error> {
        Ok(self.read()?.datarooms.iter().find(|d| d.id == id).cloned())
    }

    async fn rename_dataroom(
        &self,
        id: DataroomId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        let mut inner = self.write()?;
        if let Some(dataroom) = inner.datarooms.iter_mut().find(|d| d.id == id) {
            dataroom.name = name.to_string();
            dataroom.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_dataroom(&self, id: DataroomId) -> Result<(), Self::Error> {
        self.write()?.datarooms.retain(|d| d.id != id);
        Ok(())
    }

    async fn insert_grant(&self, grant: AccessGrant) -> Result<(), Self::Error> {
        self.write()?.grants.push(grant);
        Ok(())
    }

    async fn get_grant(&self, id: GrantId) -> Result<Option<AccessGrant>, Self::Error> {
        Ok(self.read()?.grants.iter().find(|g| g.id == id).cloned())
    }

    async fn find_grant(
        &self,
        dataroom: DataroomId,
        email: &str,
    ) -> Result<Option<AccessGrant>, Self::Error> {
        Ok(self
            .read()?
            .grants
            .iter()
            .find(|g| g.dataroom_id == dataroom && g.user_email == email)
            .cloned())
    }

    async fn list_grants_for_user(&self, email: &str) -> Result<Vec<AccessGrant>, Self::Error> {
        Ok(self
            .read()?
            .grants
            .iter()
            .filter(|g| g.user_email == email)
            .cloned()
            .collect())
    }

    async fn list_grants_for_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<AccessGrant>, Self::Error> {
        Ok(self
            .read()?
            .grants
            .iter()
            .filter(|g| g.dataroom_id == dataroom)
            .cloned()
            .collect())
    }

    async fn set_grant_role(&self, id: GrantId, role: Role) -> Result<(), Self::Error> {
        let mut inner = self.write()?;
        if let Some(grant) = inner.grants.iter_mut().find(|g| g.id == id) {
            grant.role = role;
        }
        Ok(())
    }

    async fn delete_grant(&self, id: GrantId) -> Result<(), Self::Error> {
        self.write()?.grants.retain(|g| g.id != id);
        Ok(())
    }

    async fn insert_folder(&self, folder: Folder) -> Result<(), Self::Error> {
        self.write()?.folders.push(folder);
        Ok(())
    }

    async fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, Self::Error> {
        Ok(self.read()?.folders.iter().find(|f| f.id == id).cloned())
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        let mut inner = self.write()?;
        if let Some(folder) = inner.folders.iter_mut().find(|f| f.id == id) {
            folder.name = name.to_string();
            folder.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error> {
        self.write()?.folders.retain(|f| f.id != id);
        Ok(())
    }

    async fn list_folders(
        &self,
        dataroom: DataroomId,
        parent: Option<FolderId>,
    ) -> Result<Vec<Folder>, Self::Error> {
        Ok(self
            .read()?
            .folders
            .iter()
            .filter(|f| f.dataroom_id == dataroom && f.parent_folder_id == parent)
            .cloned()
            .collect())
    }

    async fn list_child_folders(&self, parent: FolderId) -> Result<Vec<Folder>, Self::Error> {
        Ok(self
            .read()?
            .folders
            .iter()
            .filter(|f| f.parent_folder_id == Some(parent))
            .cloned()
            .collect())
    }

    async fn list_folders_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<Folder>, Self::Error> {
        Ok(self
            .read()?
            .folders
            .iter()
            .filter(|f| f.dataroom_id == dataroom)
            .cloned()
            .collect())
    }

    async fn insert_file(&self, file: FileRecord) -> Result<(), Self::Error> {
        self.write()?.files.push(file);
        Ok(())
    }

    async fn get_file(&self, id: FileId) -> Result<Option<FileRecord>, Self::Error> {
        Ok(self.read()?.files.iter().find(|f| f.id == id).cloned())
    }

    async fn find_file_by_storage_ref(
        &self,
        storage_ref: StorageRef,
    ) -> Result<Option<FileRecord>, Self::Error> {
        Ok(self
            .read()?
            .files
            .iter()
            .find(|f| f.storage_ref == storage_ref)
            .cloned())
    }

    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        let mut inner = self.write()?;
        if let Some(file) = inner.files.iter_mut().find(|f| f.id == id) {
            file.name = name.to_string();
            file.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_file(&self, id: FileId) -> Result<(), Self::Error> {
        self.write()?.files.retain(|f| f.id != id);
        Ok(())
    }

    async fn list_files(
        &self,
        dataroom: DataroomId,
        folder: Option<FolderId>,
    ) -> Result<Vec<FileRecord>, Self::Error> {
        Ok(self
            .read()?
            .files
            .iter()
            .filter(|f| f.dataroom_id == dataroom && f.folder_id == folder)
            .cloned()
            .collect())
    }

    async fn list_files_in_folder(&self, folder: FolderId) -> Result<Vec<FileRecord>, Self::Error> {
        Ok(self
            .read()?
            .files
            .iter()
            .filter(|f| f.folder_id == Some(folder))
            .cloned()
            .collect())
    }

    async fn list_files_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<FileRecord>, Self::Error> {
        Ok(self
            .read()?
            .files
            .iter()
            .filter(|f| f.dataroom_id == dataroom)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::StorageRef;
    use crate::model::timestamp;

    fn folder(dataroom: DataroomId, parent: Option<FolderId>, name: &str) -> Folder {
        let now = timestamp();
        Folder {
            id: FolderId::new(),
            name: name.to_string(),
            dataroom_id: dataroom,
            parent_folder_id: parent,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_root_filter_is_not_a_wildcard() {
        let store = MemoryStore::new();
        let room = DataroomId::new();
        let root = folder(room, None, "root");
        let nested = folder(room, Some(root.id), "nested");
        store.insert_folder(root.clone()).await.unwrap();
        store.insert_folder(nested.clone()).await.unwrap();

        let at_root = store.list_folders(room, None).await.unwrap();
        assert_eq!(at_root, vec![root.clone()]);

        let children = store.list_folders(room, Some(root.id)).await.unwrap();
        assert_eq!(children, vec![nested]);
    }

    #[tokio::test]
    async fn test_listings_keep_insertion_order() {
        let store = MemoryStore::new();
        let room = DataroomId::new();
        let names = ["zeta", "alpha", "mid"];
        for name in names {
            store.insert_folder(folder(room, None, name)).await.unwrap();
        }

        let listed: Vec<String> = store
            .list_folders_in_dataroom(room)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(listed, names);
    }

    #[tokio::test]
    async fn test_rename_and_delete_files() {
        let store = MemoryStore::new();
        let room = DataroomId::new();
        let now = timestamp();
        let file = FileRecord {
            id: FileId::new(),
            name: "a.pdf".to_string(),
            dataroom_id: room,
            folder_id: None,
            storage_ref: StorageRef::new(),
            mime_type: "application/pdf".to_string(),
            size: 10,
            created_at: now,
            updated_at: now,
        };
        store.insert_file(file.clone()).await.unwrap();

        store.rename_file(file.id, "b.pdf", now).await.unwrap();
        let renamed = store.get_file(file.id).await.unwrap().unwrap();
        assert_eq!(renamed.name, "b.pdf");

        store.delete_file(file.id).await.unwrap();
        assert!(store.get_file(file.id).await.unwrap().is_none());
        // deleting twice is a no-op
        store.delete_file(file.id).await.unwrap();
    }
}
