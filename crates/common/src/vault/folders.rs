use std::collections::HashSet;

use super::{CascadeReport, Entity, Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::{DataroomId, FolderId, UserId};
use crate::model::{timestamp, Crumb, Folder, ItemCount};
use crate::names::validate_name;
use crate::role::Role;
use crate::store::Store;

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Folders directly under `parent`, or at the root when `parent` is
    ///  `None`.
    pub async fn list_folders(
        &self,
        user: UserId,
        dataroom: DataroomId,
        parent: Option<FolderId>,
    ) -> Result<Vec<Folder>, VaultError> {
        self.authorize(user, dataroom, None).await?;
        self.store
            .list_folders(dataroom, parent)
            .await
            .map_err(VaultError::store)
    }

    pub async fn get_folder(
        &self,
        user: UserId,
        dataroom: DataroomId,
        folder: FolderId,
    ) -> Result<Folder, VaultError> {
        self.authorize(user, dataroom, None).await?;
        let record = self.load_folder(folder).await?;
        if record.dataroom_id != dataroom {
            return Err(VaultError::NotFound(Entity::Folder));
        }
        Ok(record)
    }

    pub async fn create_folder(
        &self,
        user: UserId,
        dataroom: DataroomId,
        parent: Option<FolderId>,
        name: &str,
    ) -> Result<Folder, VaultError> {
        self.authorize(user, dataroom, Some(Role::Editor)).await?;
        validate_name(name)?;
        if let Some(parent) = parent {
            self.require_parent(dataroom, parent).await?;
        }
        self.ensure_unique_folder_name(dataroom, parent, name, None)
            .await?;

        let now = timestamp();
        let folder = Folder {
            id: FolderId::new(),
            name: name.to_string(),
            dataroom_id: dataroom,
            parent_folder_id: parent,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert_folder(folder.clone())
            .await
            .map_err(VaultError::store)?;

        tracing::debug!(folder_id = %folder.id, dataroom_id = %dataroom, "folder created");
        Ok(folder)
    }

    /// Rename in place. The parent never changes, so uniqueness is checked
    ///  against the same siblings, ignoring the folder itself.
    pub async fn rename_folder(
        &self,
        user: UserId,
        folder: FolderId,
        name: &str,
    ) -> Result<Folder, VaultError> {
        let mut record = self.load_folder(folder).await?;
        self.authorize(user, record.dataroom_id, Some(Role::Editor))
            .await?;
        validate_name(name)?;
        self.ensure_unique_folder_name(
            record.dataroom_id,
            record.parent_folder_id,
            name,
            Some(folder),
        )
        .await?;

        let now = timestamp();
        self.store
            .rename_folder(folder, name, now)
            .await
            .map_err(VaultError::store)?;

        record.name = name.to_string();
        record.updated_at = now;
        Ok(record)
    }

    /// Delete a folder with every descendant folder and file, releasing
    ///  the blobs behind the files.
    pub async fn delete_folder(
        &self,
        user: UserId,
        folder: FolderId,
    ) -> Result<CascadeReport, VaultError> {
        let record = self.load_folder(folder).await?;
        self.authorize(user, record.dataroom_id, Some(Role::Editor))
            .await?;

        let report = self.cascade_folder(folder).await?;
        tracing::info!(
            folder_id = %folder,
            folders = report.folders,
            files = report.files,
            blobs = report.blobs_released,
            "folder deleted"
        );
        Ok(report)
    }

    /// Direct children only; deeper descendants are not counted.
    pub async fn folder_item_count(
        &self,
        user: UserId,
        folder: FolderId,
    ) -> Result<ItemCount, VaultError> {
        let record = self.load_folder(folder).await?;
        self.authorize(user, record.dataroom_id, None).await?;

        let folders = self
            .store
            .list_child_folders(folder)
            .await
            .map_err(VaultError::store)?;
        let files = self
            .store
            .list_files_in_folder(folder)
            .await
            .map_err(VaultError::store)?;
        Ok(ItemCount::new(folders.len(), files.len()))
    }

    /// Every folder in a dataroom at any depth, in creation order.
    pub async fn list_all_folders(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<Vec<Folder>, VaultError> {
        self.authorize(user, dataroom, None).await?;
        self.store
            .list_folders_in_dataroom(dataroom)
            .await
            .map_err(VaultError::store)
    }

    /// Root-to-leaf path ending at `folder`.
    ///
    /// The walk stops at a missing folder or at one belonging to another
    ///  dataroom, so a deleted `folder` yields an empty path.
    pub async fn breadcrumb_path(
        &self,
        user: UserId,
        dataroom: DataroomId,
        folder: FolderId,
    ) -> Result<Vec<Crumb>, VaultError> {
        self.authorize(user, dataroom, None).await?;

        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(folder);
        while let Some(id) = current {
            if !seen.insert(id) {
                tracing::warn!(folder_id = %id, "cycle in folder parent chain");
                break;
            }
            let Some(record) = self.store.get_folder(id).await.map_err(VaultError::store)? else {
                break;
            };
            if record.dataroom_id != dataroom {
                break;
            }
            path.push(Crumb::from(&record));
            current = record.parent_folder_id;
        }

        path.reverse();
        Ok(path)
    }

    pub(crate) async fn load_folder(&self, folder: FolderId) -> Result<Folder, VaultError> {
        self.store
            .get_folder(folder)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::NotFound(Entity::Folder))
    }

    /// `parent` must exist inside `dataroom`.
    pub(crate) async fn require_parent(
        &self,
        dataroom: DataroomId,
        parent: FolderId,
    ) -> Result<Folder, VaultError> {
        match self.store.get_folder(parent).await.map_err(VaultError::store)? {
            Some(folder) if folder.dataroom_id == dataroom => Ok(folder),
            _ => Err(VaultError::NotFound(Entity::Folder)),
        }
    }

    async fn ensure_unique_folder_name(
        &self,
        dataroom: DataroomId,
        parent: Option<FolderId>,
        name: &str,
        except: Option<FolderId>,
    ) -> Result<(), VaultError> {
        let siblings = self
            .store
            .list_folders(dataroom, parent)
            .await
            .map_err(VaultError::store)?;
        if siblings
            .iter()
            .any(|f| f.name == name && Some(f.id) != except)
        {
            return Err(VaultError::DuplicateName(Entity::Folder));
        }
        Ok(())
    }
}
