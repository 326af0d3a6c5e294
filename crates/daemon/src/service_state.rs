use url::Url;

use common::prelude::Vault;

use super::blobs::{BlobStorageError, ObjectBlobStorage};
use super::database::{Database, DatabaseSetupError};
use super::service_config::Config;

/// The vault as the daemon runs it.
pub type DataroomVault = Vault<Database, ObjectBlobStorage>;

/// Main service state, shared by every request handler.
#[derive(Clone, Debug)]
pub struct State {
    vault: DataroomVault,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                // parse the path into a URL
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup blob storage, served back through our own API
        let blob_store = config.blob_store.resolve(&config.data_dir);
        let blobs_url = config
            .base_url()
            .join("/api/v0/blobs/")
            .map_err(|_| StateSetupError::InvalidPublicUrl)?;
        tracing::info!(?blob_store, base_url = %blobs_url, "setting up blob storage");
        let blobs = ObjectBlobStorage::new(&blob_store, database.clone(), blobs_url).await?;

        Ok(Self {
            vault: Vault::new(database, blobs),
        })
    }

    pub fn vault(&self) -> &DataroomVault {
        &self.vault
    }

    pub fn database(&self) -> &Database {
        self.vault.store()
    }

    pub fn blobs(&self) -> &ObjectBlobStorage {
        self.vault.blobs()
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Invalid public URL")]
    InvalidPublicUrl,
    #[error("Blob storage error: {0}")]
    BlobStorage(#[from] BlobStorageError),
}
