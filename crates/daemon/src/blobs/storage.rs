use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use common::prelude::StorageRef;

use super::BlobStorageError;
use crate::state::BlobStoreConfig;

/// Wrapper around the configured object storage backend.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
}

impl Storage {
    pub async fn new(config: &BlobStoreConfig) -> Result<Self, BlobStorageError> {
        let inner: Arc<dyn ObjectStore> = match config {
            BlobStoreConfig::Memory => Arc::new(InMemory::new()),

            BlobStoreConfig::Filesystem { path } => {
                let path = path.as_ref().ok_or_else(|| {
                    BlobStorageError::InvalidConfig("filesystem blob store needs a path".into())
                })?;
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| BlobStorageError::InvalidConfig(e.to_string()))?,
                )
            }

            BlobStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"));

                let store: Arc<dyn ObjectStore> = Arc::new(
                    builder
                        .build()
                        .map_err(|e| BlobStorageError::InvalidConfig(e.to_string()))?,
                );

                // fail fast if the bucket doesn't exist
                {
                    use futures::TryStreamExt;
                    let prefix = ObjectPath::from("");
                    let mut stream = store.list(Some(&prefix));
                    match stream.try_next().await {
                        Ok(_) => {}
                        Err(object_store::Error::NotFound { .. }) => {
                            return Err(BlobStorageError::BucketNotFound(bucket.clone()));
                        }
                        Err(e) => {
                            let msg = e.to_string();
                            if msg.contains("NoSuchBucket") {
                                return Err(BlobStorageError::BucketNotFound(bucket.clone()));
                            }
                            return Err(e.into());
                        }
                    }
                }

                store
            }
        };

        Ok(Self { inner })
    }

    fn data_path(storage_ref: StorageRef) -> ObjectPath {
        ObjectPath::from(format!("data/{}", storage_ref))
    }

    pub async fn put(&self, storage_ref: StorageRef, data: Bytes) -> Result<(), BlobStorageError> {
        let path = Self::data_path(storage_ref);
        self.inner.put(&path, data.into()).await?;
        Ok(())
    }

    pub async fn get(&self, storage_ref: StorageRef) -> Result<Option<Bytes>, BlobStorageError> {
        let path = Self::data_path(storage_ref);
        match self.inner.get(&path).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Missing objects are not an error.
    pub async fn delete(&self, storage_ref: StorageRef) -> Result<(), BlobStorageError> {
        let path = Self::data_path(storage_ref);
        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
