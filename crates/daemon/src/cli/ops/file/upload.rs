use std::path::PathBuf;

use clap::Args;

use common::names::is_pdf;
use common::prelude::{DataroomId, FolderId, UserId};
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::files::{CreateRequest, UploadUrlRequest};

use super::describe;

/// Upload a local PDF: take a ticket, push the bytes, then register the file.
#[derive(Args, Debug, Clone)]
pub struct Upload {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,

    /// Dataroom to upload into
    #[arg(long)]
    pub dataroom_id: DataroomId,

    /// Folder to upload into (defaults to the dataroom root)
    #[arg(long)]
    pub folder_id: Option<FolderId>,

    /// Local file to upload
    #[arg(long)]
    pub path: PathBuf,

    /// Name to store the file under (defaults to the local file name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("only PDF files are supported, {0} looks like {1}")]
    NotPdf(PathBuf, String),
    #[error("cannot derive a file name from {0}, pass --name")]
    NoFileName(PathBuf),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Upload {
    type Error = UploadError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mime_type = mime_guess::from_path(&self.path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        if !is_pdf(&mime_type) {
            return Err(UploadError::NotPdf(self.path.clone(), mime_type));
        }

        let name = match &self.name {
            Some(name) => name.clone(),
            None => self
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| UploadError::NoFileName(self.path.clone()))?,
        };

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| UploadError::Read(self.path.clone(), e))?;

        let mut client = ctx.client.clone();
        let ticket = client
            .call(UploadUrlRequest {
                user_id: self.user_id,
            })
            .await?;
        let uploaded = client.upload_blob(&ticket.url, data, &mime_type).await?;

        let file = client
            .call(CreateRequest {
                user_id: self.user_id,
                dataroom_id: self.dataroom_id,
                folder_id: self.folder_id,
                name,
                storage_ref: uploaded.storage_ref,
                mime_type,
                size: uploaded.size,
            })
            .await?;

        Ok(format!("Uploaded {}", describe(&file)))
    }
}
