use clap::{Args, Subcommand};

pub mod download;
pub mod upload;

use common::names::format_file_size;
use common::prelude::FileRecord;
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::files::{
    DeleteRequest, GetRequest, ListRequest, RenameRequest, UrlRequest,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Ls, ListRequest),
    (Get, GetRequest),
    (Url, UrlRequest),
    (Upload, upload::Upload),
    (Download, download::Download),
    (Rename, RenameRequest),
    (Rm, DeleteRequest),
}

pub type FileCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct File {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[async_trait::async_trait]
impl Op for File {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

pub(crate) fn describe(file: &FileRecord) -> String {
    format!(
        "{}  {}  {}",
        file.id,
        file.name,
        format_file_size(file.size)
    )
}

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;

        if response.files.is_empty() {
            return Ok("No files found".to_string());
        }
        Ok(response
            .files
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for GetRequest {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let file = client.call(self.clone()).await?;
        Ok(format!(
            "{}\n  type:    {}\n  created: {}\n  updated: {}",
            describe(&file),
            file.mime_type,
            file.created_at,
            file.updated_at
        ))
    }
}

#[async_trait::async_trait]
impl Op for UrlRequest {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(match response.url {
            Some(url) => url.to_string(),
            None => "No content has been uploaded for this file".to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Op for RenameRequest {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let file = client.call(self.clone()).await?;
        Ok(format!("Renamed file {} to '{}'", file.id, file.name))
    }
}

#[async_trait::async_trait]
impl Op for DeleteRequest {
    type Error = FileOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Deleted file {}", response.file_id))
    }
}
