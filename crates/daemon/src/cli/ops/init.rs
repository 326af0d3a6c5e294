use std::path::PathBuf;

use clap::Args;
use url::Url;

use dataroom_daemon::state::{AppConfig, AppState, BlobStoreConfig, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the daemon's API listens on
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Externally reachable base URL used in upload/download links
    #[arg(long)]
    pub public_url: Option<Url>,

    /// Blob backend: memory, filesystem or s3
    #[arg(long, default_value = "filesystem")]
    pub blob_store: String,

    /// Directory for filesystem blobs (defaults to <data dir>/blobs)
    #[arg(long)]
    pub blobs_path: Option<PathBuf>,

    /// S3 endpoint URL, e.g. http://localhost:9000 for MinIO
    #[arg(long)]
    pub s3_endpoint: Option<String>,

    #[arg(long)]
    pub s3_access_key: Option<String>,

    #[arg(long)]
    pub s3_secret_key: Option<String>,

    #[arg(long)]
    pub s3_bucket: Option<String>,

    #[arg(long)]
    pub s3_region: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("unknown blob store '{0}', expected memory, filesystem or s3")]
    UnknownBlobStore(String),
    #[error("--{0} is required for the s3 blob store")]
    MissingS3Option(&'static str),
}

impl Init {
    fn blob_store_config(&self) -> Result<BlobStoreConfig, InitError> {
        match self.blob_store.as_str() {
            "memory" => Ok(BlobStoreConfig::Memory),
            "filesystem" => Ok(BlobStoreConfig::Filesystem {
                path: self.blobs_path.clone(),
            }),
            "s3" => {
                let required = |value: &Option<String>, flag: &'static str| {
                    value.clone().ok_or(InitError::MissingS3Option(flag))
                };
                Ok(BlobStoreConfig::S3 {
                    endpoint: required(&self.s3_endpoint, "s3-endpoint")?,
                    access_key: required(&self.s3_access_key, "s3-access-key")?,
                    secret_key: required(&self.s3_secret_key, "s3-secret-key")?,
                    bucket: required(&self.s3_bucket, "s3-bucket")?,
                    region: self.s3_region.clone(),
                })
            }
            other => Err(InitError::UnknownBlobStore(other.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            public_url: self.public_url.clone(),
            blob_store: self.blob_store_config()?,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized dataroom directory at {}\n  config:   {}\n  database: {}\n  blobs:    {}\n  api_port: {}",
            state.data_dir.display(),
            state.config_path.display(),
            state.db_path.display(),
            state.blobs_path.display(),
            state.config.api_port,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(blob_store: &str) -> Init {
        Init {
            api_port: 5001,
            public_url: None,
            blob_store: blob_store.to_string(),
            blobs_path: None,
            s3_endpoint: None,
            s3_access_key: None,
            s3_secret_key: None,
            s3_bucket: None,
            s3_region: None,
        }
    }

    #[test]
    fn test_blob_store_selection() {
        assert_eq!(
            init("memory").blob_store_config().unwrap(),
            BlobStoreConfig::Memory
        );
        assert_eq!(
            init("filesystem").blob_store_config().unwrap(),
            BlobStoreConfig::Filesystem { path: None }
        );
        assert!(matches!(
            init("tape").blob_store_config(),
            Err(InitError::UnknownBlobStore(_))
        ));
    }

    #[test]
    fn test_s3_requires_credentials() {
        let mut op = init("s3");
        op.s3_endpoint = Some("http://localhost:9000".to_string());
        assert!(matches!(
            op.blob_store_config(),
            Err(InitError::MissingS3Option("s3-access-key"))
        ));
    }
}
