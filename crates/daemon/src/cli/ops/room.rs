use clap::{Args, Subcommand};

use common::prelude::DataroomView;
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::datarooms::{
    CountRequest, CreateRequest, DeleteRequest, GetRequest, ListRequest, RenameRequest,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, CreateRequest),
    (List, ListRequest),
    (Get, GetRequest),
    (Rename, RenameRequest),
    (Rm, DeleteRequest),
    (Count, CountRequest),
}

// Rename the generated Command to RoomCommand for clarity
pub type RoomCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Room {
    #[command(subcommand)]
    pub command: RoomCommand,
}

#[async_trait::async_trait]
impl Op for Room {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoomOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(view: &DataroomView) -> String {
    format!("{}  {}  ({})", view.dataroom.id, view.dataroom.name, view.role)
}

#[async_trait::async_trait]
impl Op for CreateRequest {
    type Error = RoomOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let view = client.call(self.clone()).await?;
        Ok(format!("Created dataroom {}", describe(&view)))
    }
}

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = RoomOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;

        if response.datarooms.is_empty() {
            return Ok("No datarooms found".to_string());
        }
        Ok(response
            .datarooms
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for GetRequest {
    type Error = RoomOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let view = client.call(self.clone()).await?;
        Ok(format!(
            "{}\n  created: {}\n  updated: {}\n  can: {}",
            describe(&view),
            view.dataroom.created_at,
            view.dataroom.updated_at,
            view.role.capabilities().join(", ")
        ))
    }
}

#[async_trait::async_trait]
impl Op for RenameRequest {
    type Error = RoomOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let dataroom = client.call(self.clone()).await?;
        Ok(format!("Renamed dataroom {} to '{}'", dataroom.id, dataroom.name))
    }
}

#[async_trait::async_trait]
impl Op for DeleteRequest {
    type Error = RoomOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let report = client.call(self.clone()).await?;
        Ok(format!(
            "Deleted dataroom {}: {} folders, {} files, {} access grants",
            self.dataroom_id, report.folders, report.files, report.grants
        ))
    }
}

#[async_trait::async_trait]
impl Op for CountRequest {
    type Error = RoomOpError;
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
