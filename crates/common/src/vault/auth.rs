use super::{Vault, VaultError};
use crate::blobs::BlobStorage;
use crate::ids::UserId;
use crate::model::{timestamp, User, UserProfile};
use crate::store::Store;

impl<S: Store, B: BlobStorage> Vault<S, B> {
    /// Register a new user. Emails are unique, compared exactly.
    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, VaultError> {
        let existing = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(VaultError::store)?;
        if existing.is_some() {
            return Err(VaultError::DuplicateEmail);
        }

        let now = timestamp();
        let user = User {
            id: UserId::new(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: now,
            updated_at: now,
        };
        let profile = user.profile();
        self.store
            .insert_user(user)
            .await
            .map_err(VaultError::store)?;

        tracing::info!(user_id = %profile.id, "user signed up");
        Ok(profile)
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, VaultError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await
            .map_err(VaultError::store)?
            .ok_or(VaultError::InvalidCredentials)?;

        if !user.password_matches(password) {
            return Err(VaultError::InvalidCredentials);
        }
        Ok(user.profile())
    }

    pub async fn get_user(&self, user: UserId) -> Result<Option<UserProfile>, VaultError> {
        Ok(self
            .store
            .get_user(user)
            .await
            .map_err(VaultError::store)?
            .map(|u| u.profile()))
    }
}
