use std::fmt;

use crate::names::NameError;
use crate::role::Role;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Dataroom,
    Access,
    Folder,
    File,
    /// Uploaded content behind a storage ref.
    Upload,
}

impl Entity {
    fn noun(&self) -> &'static str {
        match self {
            Entity::Dataroom => "dataroom",
            Entity::Access => "access record",
            Entity::Folder => "folder",
            Entity::File => "file",
            Entity::Upload => "upload",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Every failure a vault operation can raise. Nothing is retried or
///  recovered inside the vault; the caller decides what to show.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("User not found")]
    UserNotFound,
    /// No grant exists for the caller on the dataroom.
    #[error("Access denied")]
    AccessDenied,
    /// A grant exists but its role is below the required minimum.
    #[error("Insufficient permissions")]
    InsufficientPermissions { held: Role, required: Role },
    #[error("{} not found", capitalize(.0.noun()))]
    NotFound(Entity),
    #[error("A {0} with this name already exists")]
    DuplicateName(Entity),
    #[error("User already has access to this dataroom")]
    DuplicateAccess,
    /// The owner grant can be neither changed nor revoked.
    #[error("Cannot change or remove owner access")]
    ImmutableOwner,
    #[error("Only PDF files are supported")]
    InvalidMimeType(String),
    #[error("User with this email already exists")]
    DuplicateEmail,
    /// The storage ref already backs another file record.
    #[error("This upload is already attached to a file")]
    StorageRefInUse,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidName(#[from] NameError),
    /// `owner` is only ever granted at dataroom creation.
    #[error("Role cannot be granted: {0}")]
    InvalidRole(Role),
    #[error("document store error: {0}")]
    Store(#[source] BoxError),
    #[error("blob storage error: {0}")]
    Blobs(#[source] BoxError),
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl VaultError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        VaultError::Store(Box::new(err))
    }

    pub(crate) fn blobs<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        VaultError::Blobs(Box::new(err))
    }

    /// Stable machine-readable tag.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::UserNotFound => "user_not_found",
            VaultError::AccessDenied => "access_denied",
            VaultError::InsufficientPermissions { .. } => "insufficient_permissions",
            VaultError::NotFound(_) => "not_found",
            VaultError::DuplicateName(_) => "duplicate_name",
            VaultError::DuplicateAccess => "duplicate_access",
            VaultError::ImmutableOwner => "immutable_owner",
            VaultError::InvalidMimeType(_) => "invalid_mime_type",
            VaultError::DuplicateEmail => "duplicate_email",
            VaultError::StorageRefInUse => "storage_ref_in_use",
            VaultError::InvalidCredentials => "invalid_credentials",
            VaultError::InvalidName(_) => "invalid_name",
            VaultError::InvalidRole(_) => "invalid_role",
            VaultError::Store(_) => "store_error",
            VaultError::Blobs(_) => "blob_error",
        }
    }

    /// Message suitable for showing to an end user. Provider failures are
    ///  collapsed into a generic message.
    pub fn user_message(&self) -> String {
        match self {
            VaultError::AccessDenied => {
                "You don't have permission to access this resource".to_string()
            }
            VaultError::InsufficientPermissions { .. } => {
                "You don't have permission to perform this action".to_string()
            }
            VaultError::NotFound(entity @ (Entity::Dataroom | Entity::Folder | Entity::File)) => {
                format!("The {} you're looking for doesn't exist", entity)
            }
            VaultError::Store(_) | VaultError::Blobs(_) => {
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for failures caused by a backing provider rather than by the
    ///  request itself.
    pub fn is_internal(&self) -> bool {
        matches!(self, VaultError::Store(_) | VaultError::Blobs(_))
    }
}
