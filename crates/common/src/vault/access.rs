use std::sync::Arc;

use super::{Entity, Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::{DataroomId, GrantId, UserId};
use crate::model::{timestamp, AccessGrant};
use crate::notify::{InvitationNotice, Notifier};
use crate::role::Role;
use crate::store::Store;

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Grant `email` a role on `dataroom` and schedule an invitation
    ///  notice. The notice is sent in the background and its outcome never
    ///  affects the grant.
    pub async fn invite_access(
        &self,
        user: UserId,
        dataroom: DataroomId,
        email: &str,
        role: Role,
    ) -> Result<AccessGrant, VaultError> {
        self.authorize(user, dataroom, Some(Role::Admin)).await?;
        if !role.is_grantable() {
            return Err(VaultError::InvalidRole(role));
        }

        let existing = self
            .store
            .find_grant(dataroom, email)
            .await
            .map_err(VaultError::store)?;
        if existing.is_some() {
            return Err(VaultError::DuplicateAccess);
        }

        let grant = AccessGrant {
            id: GrantId::new(),
            dataroom_id: dataroom,
            user_email: email.to_string(),
            role,
            invited_at: timestamp(),
            invited_by: Some(user),
        };
        self.store
            .insert_grant(grant.clone())
            .await
            .map_err(VaultError::store)?;

        tracing::info!(
            dataroom_id = %dataroom,
            grant_id = %grant.id,
            role = %role,
            "access granted"
        );
        self.schedule_invitation(&grant, user);
        Ok(grant)
    }

    /// Every grant on a dataroom, the owner's included.
    pub async fn list_access(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<Vec<AccessGrant>, VaultError> {
        self.authorize(user, dataroom, Some(Role::Admin)).await?;
        self.store
            .list_grants_for_dataroom(dataroom)
            .await
            .map_err(VaultError::store)
    }

    pub async fn update_access_role(
        &self,
        user: UserId,
        grant: GrantId,
        role: Role,
    ) -> Result<AccessGrant, VaultError> {
        let mut record = self.mutable_grant(user, grant).await?;
        if !role.is_grantable() {
            return Err(VaultError::InvalidRole(role));
        }

        self.store
            .set_grant_role(grant, role)
            .await
            .map_err(VaultError::store)?;

        tracing::info!(grant_id = %grant, from = %record.role, to = %role, "access role changed");
        record.role = role;
        Ok(record)
    }

    pub async fn remove_access(&self, user: UserId, grant: GrantId) -> Result<(), VaultError> {
        let record = self.mutable_grant(user, grant).await?;
        self.store
            .delete_grant(grant)
            .await
            .map_err(VaultError::store)?;

        tracing::info!(grant_id = %grant, dataroom_id = %record.dataroom_id, "access revoked");
        Ok(())
    }

    /// The caller's role on a dataroom. Unknown users and missing grants
    ///  both yield `None`.
    pub async fn check_access(
        &self,
        user: UserId,
        dataroom: DataroomId,
    ) -> Result<Option<Role>, VaultError> {
        let Some(user) = self.store.get_user(user).await.map_err(VaultError::store)? else {
            return Ok(None);
        };
        Ok(self
            .store
            .find_grant(dataroom, &user.email)
            .await
            .map_err(VaultError::store)?
            .map(|g| g.role))
    }

    /// Load a grant the caller is about to change: it must exist, the
    ///  caller must be an admin on its dataroom, and it must not be the
    ///  owner grant.
    async fn mutable_grant(&self, user: UserId, grant: GrantId) -> Result<AccessGrant, VaultError> {
        let record = self
            .store
            .get_grant(grant)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::NotFound(Entity::Access))?;

        self.authorize(user, record.dataroom_id, Some(Role::Admin))
            .await?;
        if record.is_owner() {
            return Err(VaultError::ImmutableOwner);
        }
        Ok(record)
    }

    fn schedule_invitation(&self, grant: &AccessGrant, inviter: UserId) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(grant_id = %grant.id, "no runtime available, invitation notice dropped");
            return;
        };

        let store = self.store.clone();
        let notifier: Arc<dyn Notifier> = self.notifier.clone();
        let grant = grant.clone();
        handle.spawn(async move {
            let notice = match invitation_notice(&store, &grant, inviter).await {
                Ok(notice) => notice,
                Err(e) => {
                    tracing::warn!(grant_id = %grant.id, "failed to build invitation notice: {}", e);
                    return;
                }
            };
            if let Err(e) = notifier.notify_invitation(&notice).await {
                tracing::warn!(grant_id = %grant.id, "failed to send invitation notice: {}", e);
            }
        });
    }
}

async fn invitation_notice<S: Store>(
    store: &S,
    grant: &AccessGrant,
    inviter: UserId,
) -> Result<InvitationNotice, S::Error> {
    let dataroom = store.get_dataroom(grant.dataroom_id).await?;
    let inviter = store.get_user(inviter).await?;
    Ok(InvitationNotice {
        to_email: grant.user_email.clone(),
        dataroom_id: grant.dataroom_id,
        dataroom_name: dataroom.map(|d| d.name).unwrap_or_default(),
        inviter_name: inviter
            .as_ref()
            .map(|u| u.full_name.clone())
            .unwrap_or_default(),
        inviter_email: inviter.map(|u| u.email).unwrap_or_default(),
        role: grant.role,
    })
}
