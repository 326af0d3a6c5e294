//! Object storage for file content (memory / local filesystem / S3).
//!
//! Ticket bookkeeping lives in SQLite next to the documents; the bytes live
//! in whichever `object_store` backend the config selects.

mod storage;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use common::blobs::blob_url;
use common::prelude::{BlobStorage, StorageRef, UploadTicket};

use crate::database::Database;
use crate::state::BlobStoreConfig;

pub use storage::Storage;

/// [`BlobStorage`] backed by `object_store`.
///
/// URLs handed out point at the daemon's own `/api/v0/blobs/{ref}`
/// endpoint, so the object store never has to be reachable by clients.
#[derive(Debug, Clone)]
pub struct ObjectBlobStorage {
    storage: Storage,
    db: Database,
    base_url: Url,
}

impl ObjectBlobStorage {
    pub async fn new(
        config: &BlobStoreConfig,
        db: Database,
        base_url: Url,
    ) -> Result<Self, BlobStorageError> {
        let storage = Storage::new(config).await?;
        Ok(Self {
            storage,
            db,
            base_url,
        })
    }

    /// Store the content for a previously issued ref. Each ref takes
    ///  content exactly once.
    pub async fn put(&self, storage_ref: StorageRef, data: Bytes) -> Result<u64, BlobStorageError> {
        let size = data.len() as u64;
        if !self.db.claim_blob_upload(storage_ref, size).await? {
            return match self.db.get_blob_ticket(storage_ref).await? {
                Some(_) => Err(BlobStorageError::AlreadyUploaded(storage_ref)),
                None => Err(BlobStorageError::UnknownRef(storage_ref)),
            };
        }

        if let Err(e) = self.storage.put(storage_ref, data).await {
            self.db.release_blob_claim(storage_ref).await?;
            return Err(e);
        }

        tracing::debug!(%storage_ref, size, "blob stored");
        Ok(size)
    }

    pub async fn get(&self, storage_ref: StorageRef) -> Result<Option<Bytes>, BlobStorageError> {
        self.storage.get(storage_ref).await
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl BlobStorage for ObjectBlobStorage {
    type Error = BlobStorageError;

    async fn generate_upload_url(&self) -> Result<UploadTicket, Self::Error> {
        let storage_ref = StorageRef::new();
        self.db.insert_blob_ticket(storage_ref).await?;
        let url = blob_url(&self.base_url, storage_ref)?;
        Ok(UploadTicket { url, storage_ref })
    }

    async fn get_url(&self, storage_ref: StorageRef) -> Result<Option<Url>, Self::Error> {
        match self.db.get_blob_ticket(storage_ref).await? {
            Some(ticket) if ticket.uploaded => Ok(Some(blob_url(&self.base_url, storage_ref)?)),
            _ => Ok(None),
        }
    }

    async fn delete(&self, storage_ref: StorageRef) -> Result<(), Self::Error> {
        self.storage.delete(storage_ref).await?;
        self.db.delete_blob_ticket(storage_ref).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid blob url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("storage ref was never issued: {0}")]
    UnknownRef(StorageRef),

    #[error("storage ref already holds content: {0}")]
    AlreadyUploaded(StorageRef),

    /// S3 bucket not found - must be created before use
    #[error("S3 bucket '{0}' does not exist. Create it before starting the daemon.")]
    BucketNotFound(String),
}
