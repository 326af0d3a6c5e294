use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "dataroom";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const BLOBS_DIR_NAME: &str = "blobs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Externally reachable base URL, used to build upload and download
    /// links. Defaults to `http://localhost:{api_port}`.
    #[serde(default)]
    pub public_url: Option<Url>,
    /// Where file content is stored
    #[serde(default)]
    pub blob_store: BlobStoreConfig,
}

fn default_api_port() -> u16 {
    5001
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            public_url: None,
            blob_store: BlobStoreConfig::default(),
        }
    }
}

/// Configuration for the blob storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlobStoreConfig {
    /// In-process storage, lost on restart
    Memory,

    /// Local filesystem storage
    Filesystem {
        /// Defaults to `{data_dir}/blobs/`
        path: Option<PathBuf>,
    },

    /// S3-compatible object storage
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        access_key: String,
        secret_key: String,
        bucket: String,
        /// Defaults to "us-east-1"
        region: Option<String>,
    },
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        BlobStoreConfig::Filesystem { path: None }
    }
}

impl BlobStoreConfig {
    /// Fill in the filesystem default path relative to `data_dir`.
    pub fn resolve(&self, data_dir: &Path) -> Self {
        match self {
            BlobStoreConfig::Filesystem { path: None } => BlobStoreConfig::Filesystem {
                path: Some(data_dir.join(BLOBS_DIR_NAME)),
            },
            other => other.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the data directory (~/.dataroom)
    pub data_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the blobs directory
    pub blobs_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the data directory path (custom or default ~/.dataroom)
    pub fn data_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new data directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let data_dir = Self::data_dir(custom_path)?;

        if data_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&data_dir)?;

        let blobs_path = data_dir.join(BLOBS_DIR_NAME);
        fs::create_dir_all(&blobs_path)?;

        let config = config.unwrap_or_default();
        let config_path = data_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (the daemon migrates it on first start)
        let db_path = data_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            data_dir,
            db_path,
            blobs_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the data directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let data_dir = Self::data_dir(custom_path)?;

        if !data_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = data_dir.join(DB_FILE_NAME);
        let blobs_path = data_dir.join(BLOBS_DIR_NAME);
        let config_path = data_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !blobs_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", BLOBS_DIR_NAME)));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            data_dir,
            db_path,
            blobs_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("data directory not initialized. Run 'dataroom init' first")]
    NotInitialized,

    #[error("data directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("state");

        let config = AppConfig {
            api_port: 6001,
            ..Default::default()
        };
        let created = AppState::init(Some(dir.clone()), Some(config)).unwrap();
        assert!(created.db_path.exists());
        assert!(created.blobs_path.is_dir());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config.api_port, 6001);
        assert_eq!(loaded.config.blob_store, BlobStoreConfig::Filesystem { path: None });

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(temp.path().join("nope"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_blob_store_config_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            api_port = 7000
            public_url = "https://rooms.example.com/"

            [blob_store]
            type = "s3"
            endpoint = "http://localhost:9000"
            access_key = "minio"
            secret_key = "minio123"
            bucket = "datarooms"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_port, 7000);
        assert!(matches!(
            config.blob_store,
            BlobStoreConfig::S3 { ref bucket, region: None, .. } if bucket == "datarooms"
        ));

        let resolved = BlobStoreConfig::default().resolve(Path::new("/data"));
        assert_eq!(
            resolved,
            BlobStoreConfig::Filesystem {
                path: Some(PathBuf::from("/data/blobs"))
            }
        );
    }
}
