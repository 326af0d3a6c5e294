mod memory;

pub use memory::{MemoryBlobStorage, MemoryBlobStorageError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ids::StorageRef;

/// A pre-authorized upload target. The client pushes the bytes to `url`
///  and then registers the file with `storage_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTicket {
    pub url: Url,
    pub storage_ref: StorageRef,
}

/// Object storage holding the content behind each file record.
#[async_trait]
pub trait BlobStorage: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reserve a fresh storage ref and return where to upload to it.
    async fn generate_upload_url(&self) -> Result<UploadTicket, Self::Error>;

    /// Where the blob can be fetched from, or `None` if nothing was
    ///  ever uploaded under `storage_ref`.
    async fn get_url(&self, storage_ref: StorageRef) -> Result<Option<Url>, Self::Error>;

    /// Release a blob. Deleting an unknown ref is not an error.
    async fn delete(&self, storage_ref: StorageRef) -> Result<(), Self::Error>;
}

/// `{base}/{storage_ref}`, tolerating a base with or without a
///  trailing slash.
pub fn blob_url(base: &Url, storage_ref: StorageRef) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&storage_ref.to_string())
}
