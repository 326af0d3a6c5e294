use super::{Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::{DataroomId, UserId};
use crate::model::{AccessGrant, User};
use crate::role::Role;
use crate::store::Store;

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Resolve the acting user or fail with `UserNotFound`.
    pub(crate) async fn require_user(&self, user: UserId) -> Result<User, VaultError> {
        self.store
            .get_user(user)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::UserNotFound)
    }

    /// The authorization choke point.
    ///
    /// # Arguments
    /// * `user` - the acting user
    /// * `dataroom` - the dataroom being operated on
    /// * `minimum` - the least privileged role allowed, `None` for any role
    ///
    /// # Returns
    /// * `Ok(AccessGrant)` - the caller's grant
    /// * `Err(VaultError::UserNotFound)` - `user` does not resolve
    /// * `Err(VaultError::AccessDenied)` - no grant on `dataroom`
    /// * `Err(VaultError::InsufficientPermissions)` - grant below `minimum`
    pub async fn authorize(
        &self,
        user: UserId,
        dataroom: DataroomId,
        minimum: Option<Role>,
    ) -> Result<AccessGrant, VaultError> {
        let user = self.require_user(user).await?;
        let grant = self
            .store
            .find_grant(dataroom, &user.email)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::AccessDenied)?;

        if let Some(required) = minimum {
            if !grant.role.meets_minimum(required) {
                tracing::debug!(
                    user_id = %user.id,
                    dataroom_id = %dataroom,
                    held = %grant.role,
                    required = %required,
                    "insufficient permissions"
                );
                return Err(VaultError::InsufficientPermissions {
                    held: grant.role,
                    required,
                });
            }
        }

        Ok(grant)
    }
}
