use super::{CascadeReport, Entity, Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::{DataroomId, GrantId, UserId};
use crate::model::{timestamp, AccessGrant, Dataroom, DataroomView, ItemCount};
use crate::names::validate_name;
use crate::role::Role;
use crate::store::Store;

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Create a dataroom owned by `user`. The owner grant is written
    ///  together with the dataroom.
    pub async fn create_dataroom(
        &self,
        user: UserId,
        name: &str,
    ) -> Result<DataroomView, VaultError> {
        let owner = self.require_user(user).await?;
        validate_name(name)?;

        // an owner may not hold two datarooms whose names differ only by case
        let wanted = name.to_lowercase();
        let grants = self
            .store
            .list_grants_for_user(&owner.email)
            .await
            .map_err(VaultError::store)?;
        for grant in grants.iter().filter(|g| g.is_owner()) {
            let existing = self
                .store
                .get_dataroom(grant.dataroom_id)
                .await
                .map_err(VaultError::store)?;
            if existing.is_some_and(|d| d.name.to_lowercase() == wanted) {
                return Err(VaultError::DuplicateName(Entity::Dataroom));
            }
        }

        let now = timestamp();
        let dataroom = Dataroom {
            id: DataroomId::new(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        let grant = AccessGrant {
            id: GrantId::new(),
            dataroom_id: dataroom.id,
            user_email: owner.email.clone(),
            role: Role::Owner,
            invited_at: now,
            invited_by: None,
        };
        self.store
            .insert_dataroom_with_owner(dataroom.clone(), grant)
            .await
            .map_err(VaultError::store)?;

        tracing::info!(dataroom_id = %dataroom.id, owner = %owner.id, "dataroom created");
        Ok(DataroomView {
            dataroom,
            role: Role::Owner,
        })
    }

    /// Every dataroom the user holds a grant on, with the granted role.
    pub async fn list_my_datarooms(&self, user: UserId) -> Result<Vec<DataroomView>, VaultError> {
        let user = self.require_user(user).await?;
        let grants = self
            .store
            .list_grants_for_user(&user.email)
            .await
            .map_err(VaultError::store)?;

        let mut views = Vec::with_capacity(grants.len());
        for grant in grants {
            // grants can briefly outlive a dataroom mid-delete
            if let Some(dataroom) = self
                .store
                .get_dataroom(grant.dataroom_id)
                .await
                .map_err(VaultError::store)?
            {
                views.push(DataroomView {
                    dataroom,
                    role: grant.role,
                });
            }
        }
        Ok(views)
    }

    pub async fn get_dataroom(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<DataroomView, VaultError> {
        let grant = self.authorize(user, dataroom, None).await?;
        let dataroom = self.load_dataroom(dataroom).await?;
        Ok(DataroomView {
            dataroom,
            role: grant.role,
        })
    }

    pub async fn rename_dataroom(
        &self,
        user: UserId,
        dataroom: DataroomId,
        name: &str,
    ) -> Result<Dataroom, VaultError> {
        self.authorize(user, dataroom, Some(Role::Editor)).await?;
        validate_name(name)?;
        let mut record = self.load_dataroom(dataroom).await?;

        let now = timestamp();
        self.store
            .rename_dataroom(dataroom, name, now)
            .await
            .map_err(VaultError::store)?;

        record.name = name.to_string();
        record.updated_at = now;
        Ok(record)
    }

    /// Delete a dataroom and everything in it: folder trees, remaining
    ///  files and their blobs, every access grant, then the dataroom.
    pub async fn delete_dataroom(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<CascadeReport, VaultError> {
        self.authorize(user, dataroom, Some(Role::Owner)).await?;
        self.load_dataroom(dataroom).await?;

        let mut report = CascadeReport::default();

        let roots = self
            .store
            .list_folders(dataroom, None)
            .await
            .map_err(VaultError::store)?;
        for root in roots {
            report.merge(self.cascade_folder(root.id).await?);
        }

        // folders whose parent chain is broken never show up as roots
        let stray = self
            .store
            .list_folders_in_dataroom(dataroom)
            .await
            .map_err(VaultError::store)?;
        for folder in stray {
            report.merge(self.cascade_folder(folder.id).await?);
        }

        // root-level files and anything left under a missing folder
        let files = self
            .store
            .list_files_in_dataroom(dataroom)
            .await
            .map_err(VaultError::store)?;
        for file in files {
            self.remove_file_record(&file).await?;
            report.files += 1;
            report.blobs_released += 1;
        }

        let grants = self
            .store
            .list_grants_for_dataroom(dataroom)
            .await
            .map_err(VaultError::store)?;
        for grant in grants {
            self.store
                .delete_grant(grant.id)
                .await
                .map_err(VaultError::store)?;
            report.grants += 1;
        }

        self.store
            .delete_dataroom(dataroom)
            .await
            .map_err(VaultError::store)?;

        tracing::info!(
            dataroom_id = %dataroom,
            folders = report.folders,
            files = report.files,
            blobs = report.blobs_released,
            grants = report.grants,
            "dataroom deleted"
        );
        Ok(report)
    }

    /// Direct root-level children of a dataroom.
    pub async fn dataroom_item_count(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<ItemCount, VaultError> {
        self.authorize(user, dataroom, None).await?;
        let folders = self
            .store
            .list_folders(dataroom, None)
            .await
            .map_err(VaultError::store)?;
        let files = self
            .store
            .list_files(dataroom, None)
            .await
            .map_err(VaultError::store)?;
        Ok(ItemCount::new(folders.len(), files.len()))
    }

    pub(crate) async fn load_dataroom(&self, dataroom: DataroomId) -> Result<Dataroom, VaultError> {
        self.store
            .get_dataroom(dataroom)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::NotFound(Entity::Dataroom))
    }
}
