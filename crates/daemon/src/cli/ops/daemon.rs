use clap::Args;
use url::Url;

use dataroom_daemon::state::AppState;
use dataroom_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Base URL for upload/download links (e.g., https://rooms.example.com)
    #[arg(long)]
    pub public_url: Option<Url>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] dataroom_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.dataroom)
        let state = AppState::load(ctx.config_path.clone())?;

        // Flags win over config.toml
        let api_port = self.api_port.unwrap_or(state.config.api_port);
        let public_url = self
            .public_url
            .clone()
            .or_else(|| state.config.public_url.clone());

        let config = ServiceConfig {
            blob_store: state.config.blob_store.clone(),
            data_dir: state.data_dir.clone(),
            api_port,
            public_url,
            sqlite_path: Some(state.db_path),
            log_level: tracing::Level::DEBUG,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
