use serde::{Deserialize, Serialize};
use url::Url;

use super::{Entity, Vault, VaultError};
use crate::blobs::{BlobStorage, UploadTicket};
use crate::ids::{DataroomId, FileId, FolderId, StorageRef, UserId};
use crate::model::{timestamp, FileRecord};
use crate::names::{is_pdf, validate_name};
use crate::role::Role;
use crate::store::Store;

/// A file to register after its bytes were uploaded under `storage_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    pub name: String,
    /// `None` places the file at the dataroom root.
    pub folder_id: Option<FolderId>,
    pub storage_ref: StorageRef,
    pub mime_type: String,
    pub size: u64,
}

impl<S: Store, B: BlobStorage> Vault<S, B> {
    pub async fn list_files(
        &self,
        user: UserId,
        dataroom: DataroomId,
        folder: Option<FolderId>,
    ) -> Result<Vec<FileRecord>, VaultError> {
        self.authorize(user, dataroom, None).await?;
        self.store
            .list_files(dataroom, folder)
            .await
            .map_err(VaultError::store)
    }

    pub async fn get_file(&self, user: UserId, file: FileId) -> Result<FileRecord, VaultError> {
        let record = self.load_file(file).await?;
        self.authorize(user, record.dataroom_id, None).await?;
        Ok(record)
    }

    /// Download location for a file's content, `None` if the blob is gone.
    pub async fn file_download_url(
        &self,
        user: UserId,
        file: FileId,
    ) -> Result<Option<Url>, VaultError> {
        let record = self.get_file(user, file).await?;
        self.blobs
            .get_url(record.storage_ref)
            .await
            .map_err(VaultError::blobs)
    }

    /// Register an uploaded file. Only `application/pdf` is accepted,
    ///  names are unique within a (dataroom, folder) location, and the
    ///  storage ref must hold content no other file record points at.
    pub async fn create_file(
        &self,
        user: UserId,
        dataroom: DataroomId,
        file: NewFile,
    ) -> Result<FileRecord, VaultError> {
        self.authorize(user, dataroom, Some(Role::Editor)).await?;
        if !is_pdf(&file.mime_type) {
            return Err(VaultError::InvalidMimeType(file.mime_type));
        }
        validate_name(&file.name)?;
        if let Some(folder) = file.folder_id {
            self.require_parent(dataroom, folder).await?;
        }
        self.ensure_unique_file_name(dataroom, file.folder_id, &file.name, None)
            .await?;
        self.ensure_fresh_upload(file.storage_ref).await?;

        let now = timestamp();
        let record = FileRecord {
            id: FileId::new(),
            name: file.name,
            dataroom_id: dataroom,
            folder_id: file.folder_id,
            storage_ref: file.storage_ref,
            mime_type: file.mime_type,
            size: file.size,
            created_at: now,
            updated_at: now,
        };
        self.store
            .insert_file(record.clone())
            .await
            .map_err(VaultError::store)?;

        tracing::debug!(file_id = %record.id, dataroom_id = %dataroom, size = record.size, "file created");
        Ok(record)
    }

    /// Rename in place. The MIME type is not re-checked.
    pub async fn rename_file(
        &self,
        user: UserId,
        file: FileId,
        name: &str,
    ) -> Result<FileRecord, VaultError> {
        let mut record = self.load_file(file).await?;
        self.authorize(user, record.dataroom_id, Some(Role::Editor))
            .await?;
        validate_name(name)?;
        self.ensure_unique_file_name(record.dataroom_id, record.folder_id, name, Some(file))
            .await?;

        let now = timestamp();
        self.store
            .rename_file(file, name, now)
            .await
            .map_err(VaultError::store)?;

        record.name = name.to_string();
        record.updated_at = now;
        Ok(record)
    }

    /// Drop the record, then release its blob. A failed release only
    ///  leaves an orphaned object behind and is logged.
    pub async fn delete_file(&self, user: UserId, file: FileId) -> Result<(), VaultError> {
        let record = self.load_file(file).await?;
        self.authorize(user, record.dataroom_id, Some(Role::Editor))
            .await?;
        self.store
            .delete_file(record.id)
            .await
            .map_err(VaultError::store)?;
        if let Err(e) = self.blobs.delete(record.storage_ref).await {
            tracing::warn!(
                file_id = %record.id,
                storage_ref = %record.storage_ref,
                "file removed but its blob was not released: {}",
                e
            );
        }
        Ok(())
    }

    /// Issue an upload ticket. Any existing user may ask for one; the
    ///  dataroom is only checked when the file is registered.
    pub async fn generate_upload_url(&self, user: UserId) -> Result<UploadTicket, VaultError> {
        self.require_user(user).await?;
        self.blobs
            .generate_upload_url()
            .await
            .map_err(VaultError::blobs)
    }

    async fn load_file(&self, file: FileId) -> Result<FileRecord, VaultError> {
        self.store
            .get_file(file)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::NotFound(Entity::File))
    }

    async fn ensure_fresh_upload(&self, storage_ref: StorageRef) -> Result<(), VaultError> {
        if self
            .store
            .find_file_by_storage_ref(storage_ref)
            .await
            .map_err(VaultError::store)?
            .is_some()
        {
            return Err(VaultError::StorageRefInUse);
        }
        let uploaded = self
            .blobs
            .get_url(storage_ref)
            .await
            .map_err(VaultError::blobs)?;
        if uploaded.is_none() {
            return Err(VaultError::NotFound(Entity::Upload));
        }
        Ok(())
    }

    async fn ensure_unique_file_name(
        &self,
        dataroom: DataroomId,
        folder: Option<FolderId>,
        name: &str,
        except: Option<FileId>,
    ) -> Result<(), VaultError> {
        let siblings = self
            .store
            .list_files(dataroom, folder)
            .await
            .map_err(VaultError::store)?;
        if siblings
            .iter()
            .any(|f| f.name == name && Some(f.id) != except)
        {
            return Err(VaultError::DuplicateName(Entity::File));
        }
        Ok(())
    }
}
