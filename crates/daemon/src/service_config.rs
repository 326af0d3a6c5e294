use std::path::PathBuf;

use url::Url;

use crate::state::BlobStoreConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // blob store configuration
    /// Blob storage backend configuration
    pub blob_store: BlobStoreConfig,
    /// Path to the data directory, used to resolve default blob paths
    pub data_dir: PathBuf,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// Externally reachable base URL for upload/download links,
    ///  defaults to `http://localhost:{api_port}`
    pub public_url: Option<Url>,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Everything in memory: no database file, no blob directory.
    pub fn ephemeral(api_port: u16) -> Self {
        Self {
            blob_store: BlobStoreConfig::Memory,
            data_dir: std::env::temp_dir(),
            api_port,
            public_url: None,
            sqlite_path: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }

    /// The base URL clients reach the API on.
    pub fn base_url(&self) -> Url {
        match &self.public_url {
            Some(url) => url.clone(),
            None => Url::parse(&format!("http://localhost:{}", self.api_port))
                .expect("localhost URL must parse"),
        }
    }
}
