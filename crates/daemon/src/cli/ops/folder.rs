use clap::{Args, Subcommand};

use common::prelude::Folder as FolderRecord;
use common::vault::PATH_SEPARATOR;
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::folders::{
    AllRequest, CountRequest, CreateRequest, DeleteRequest, GetRequest, ListRequest, PathRequest,
    RenameRequest,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Ls, ListRequest),
    (Get, GetRequest),
    (Create, CreateRequest),
    (Rename, RenameRequest),
    (Rm, DeleteRequest),
    (Count, CountRequest),
    (All, AllRequest),
    (Path, PathRequest),
}

pub type FolderCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Folder {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[async_trait::async_trait]
impl Op for Folder {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FolderOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(folder: &FolderRecord) -> String {
    match folder.parent_folder_id {
        Some(parent) => format!("{}  {}/  (in {})", folder.id, folder.name, parent),
        None => format!("{}  {}/", folder.id, folder.name),
    }
}

fn describe_all(folders: &[FolderRecord], empty: &str) -> String {
    if folders.is_empty() {
        return empty.to_string();
    }
    folders.iter().map(describe).collect::<Vec<_>>().join("\n")
}

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(describe_all(&response.folders, "No folders found"))
    }
}

#[async_trait::async_trait]
impl Op for GetRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let folder = client.call(self.clone()).await?;
        Ok(format!(
            "{}\n  created: {}\n  updated: {}",
            describe(&folder),
            folder.created_at,
            folder.updated_at
        ))
    }
}

#[async_trait::async_trait]
impl Op for CreateRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let folder = client.call(self.clone()).await?;
        Ok(format!("Created folder {}", describe(&folder)))
    }
}

#[async_trait::async_trait]
impl Op for RenameRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let folder = client.call(self.clone()).await?;
        Ok(format!("Renamed folder {} to '{}'", folder.id, folder.name))
    }
}

#[async_trait::async_trait]
impl Op for DeleteRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let report = client.call(self.clone()).await?;
        Ok(format!(
            "Deleted {} folders and {} files",
            report.folders, report.files
        ))
    }
}

#[async_trait::async_trait]
impl Op for CountRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let count = client.call(self.clone()).await?;
        Ok(format!(
            "{} folders, {} files ({} items)",
            count.folders, count.files, count.total
        ))
    }
}

#[async_trait::async_trait]
impl Op for AllRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(describe_all(&response.folders, "No folders found"))
    }
}

#[async_trait::async_trait]
impl Op for PathRequest {
    type Error = FolderOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        if response.path.is_empty() {
            return Ok("Folder is not part of this dataroom".to_string());
        }
        Ok(response
            .path
            .iter()
            .map(|crumb| crumb.name.as_str())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR))
    }
}
