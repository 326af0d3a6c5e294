use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use url::Url;

use super::{blob_url, BlobStorage, UploadTicket};
use crate::ids::StorageRef;

const DEFAULT_BASE_URL: &str = "memory://blobs/";

/// Blob storage held in process memory.
#[derive(Debug, Clone)]
pub struct MemoryBlobStorage {
    base_url: Url,
    inner: Arc<RwLock<MemoryBlobStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryBlobStorageInner {
    /// Refs handed out by `generate_upload_url`
    issued: HashSet<StorageRef>,
    blobs: HashMap<StorageRef, Vec<u8>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryBlobStorageError {
    #[error("memory blob storage error: {0}")]
    Internal(String),
    #[error("storage ref was never issued: {0}")]
    UnknownRef(StorageRef),
    #[error("storage ref already holds content: {0}")]
    AlreadyUploaded(StorageRef),
    #[error("invalid blob url: {0}")]
    Url(#[from] url::ParseError),
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::with_base_url(Url::parse(DEFAULT_BASE_URL).expect("valid default base url"))
    }

    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            inner: Arc::new(RwLock::new(MemoryBlobStorageInner::default())),
        }
    }

    fn lock_err<E: std::fmt::Display>(e: E) -> MemoryBlobStorageError {
        MemoryBlobStorageError::Internal(format!("failed to acquire lock: {}", e))
    }

    /// Store the content for a previously issued ref, once.
    pub fn put(&self, storage_ref: StorageRef, data: Vec<u8>) -> Result<(), MemoryBlobStorageError> {
        let mut inner = self.inner.write().map_err(Self::lock_err)?;
        if !inner.issued.contains(&storage_ref) {
            return Err(MemoryBlobStorageError::UnknownRef(storage_ref));
        }
        if inner.blobs.contains_key(&storage_ref) {
            return Err(MemoryBlobStorageError::AlreadyUploaded(storage_ref));
        }
        inner.blobs.insert(storage_ref, data);
        Ok(())
    }

    pub fn get(&self, storage_ref: StorageRef) -> Result<Option<Vec<u8>>, MemoryBlobStorageError> {
        let inner = self.inner.read().map_err(Self::lock_err)?;
        Ok(inner.blobs.get(&storage_ref).cloned())
    }

    pub fn contains(&self, storage_ref: StorageRef) -> bool {
        self.inner
            .read()
            .map(|inner| inner.blobs.contains_key(&storage_ref))
            .unwrap_or(false)
    }

    /// Number of blobs currently holding content.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryBlobStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStorage for MemoryBlobStorage {
    type Error = MemoryBlobStorageError;

    async fn generate_upload_url(&self) -> Result<UploadTicket, Self::Error> {
        let storage_ref = StorageRef::new();
        let url = blob_url(&self.base_url, storage_ref)?;
        self.inner
            .write()
            .map_err(Self::lock_err)?
            .issued
            .insert(storage_ref);
        Ok(UploadTicket { url, storage_ref })
    }

    async fn get_url(&self, storage_ref: StorageRef) -> Result<Option<Url>, Self::Error> {
        if !self.contains(storage_ref) {
            return Ok(None);
        }
        Ok(Some(blob_url(&self.base_url, storage_ref)?))
    }

    async fn delete(&self, storage_ref: StorageRef) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().map_err(Self::lock_err)?;
        inner.blobs.remove(&storage_ref);
        inner.issued.remove(&storage_ref);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_fetch_url() {
        let blobs = MemoryBlobStorage::new();
        let ticket = blobs.generate_upload_url().await.unwrap();
        assert!(blobs.get_url(ticket.storage_ref).await.unwrap().is_none());

        blobs.put(ticket.storage_ref, b"%PDF-1.7".to_vec()).unwrap();
        let url = blobs.get_url(ticket.storage_ref).await.unwrap().unwrap();
        assert_eq!(url, ticket.url);
    }

    #[tokio::test]
    async fn test_put_rejects_unissued_ref() {
        let blobs = MemoryBlobStorage::new();
        let stray = StorageRef::new();
        assert_eq!(
            blobs.put(stray, vec![1, 2, 3]),
            Err(MemoryBlobStorageError::UnknownRef(stray))
        );
    }

    #[tokio::test]
    async fn test_put_only_once() {
        let blobs = MemoryBlobStorage::new();
        let ticket = blobs.generate_upload_url().await.unwrap();
        blobs.put(ticket.storage_ref, b"%PDF-1.7".to_vec()).unwrap();

        assert_eq!(
            blobs.put(ticket.storage_ref, b"EVIL".to_vec()),
            Err(MemoryBlobStorageError::AlreadyUploaded(ticket.storage_ref))
        );
        assert_eq!(
            blobs.get(ticket.storage_ref).unwrap().unwrap(),
            b"%PDF-1.7".to_vec()
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let blobs = MemoryBlobStorage::new();
        let ticket = blobs.generate_upload_url().await.unwrap();
        blobs.put(ticket.storage_ref, vec![0]).unwrap();

        blobs.delete(ticket.storage_ref).await.unwrap();
        blobs.delete(ticket.storage_ref).await.unwrap();
        assert!(!blobs.contains(ticket.storage_ref));
        assert!(blobs.is_empty());
    }
}
