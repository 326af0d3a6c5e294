use std::path::PathBuf;

use clap::Args;

use common::prelude::{FileId, UserId};
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::files::{GetRequest, UrlRequest};

/// Fetch a file's content to disk.
#[derive(Args, Debug, Clone)]
pub struct Download {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,

    /// File to download
    #[arg(long)]
    pub file_id: FileId,

    /// Where to write the content (defaults to the file's name in the current directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("file {0} has no uploaded content")]
    NoContent(FileId),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Download {
    type Error = DownloadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();

        let file = client
            .call(GetRequest {
                user_id: self.user_id,
                file_id: self.file_id,
            })
            .await?;
        let url = client
            .call(UrlRequest {
                user_id: self.user_id,
                file_id: self.file_id,
            })
            .await?
            .url
            .ok_or(DownloadError::NoContent(self.file_id))?;

        let data = client.download_blob(&url).await?;

        let out = self
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(&file.name));
        tokio::fs::write(&out, &data)
            .await
            .map_err(|e| DownloadError::Write(out.clone(), e))?;

        Ok(format!("Wrote {} bytes to {}", data.len(), out.display()))
    }
}
