use clap::{Args, Subcommand};

use common::prelude::AccessGrant;
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::access::{
    CheckRequest, InviteRequest, ListRequest, RemoveRequest, RoleRequest,
};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Invite, InviteRequest),
    (Ls, ListRequest),
    (Role, RoleRequest),
    (Rm, RemoveRequest),
    (Check, CheckRequest),
}

pub type AccessCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Access {
    #[command(subcommand)]
    pub command: AccessCommand,
}

#[async_trait::async_trait]
impl Op for Access {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccessOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(grant: &AccessGrant) -> String {
    format!(
        "{}  {}  {}  invited {}",
        grant.id,
        grant.user_email,
        grant.role,
        grant.invited_at.date()
    )
}

#[async_trait::async_trait]
impl Op for InviteRequest {
    type Error = AccessOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let grant = client.call(self.clone()).await?;
        Ok(format!("Invited {}", describe(&grant)))
    }
}

#[async_trait::async_trait]
impl Op for ListRequest {
    type Error = AccessOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(response
            .grants
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[async_trait::async_trait]
impl Op for RoleRequest {
    type Error = AccessOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let grant = client.call(self.clone()).await?;
        Ok(format!("{} is now {}", grant.user_email, grant.role))
    }
}

#[async_trait::async_trait]
impl Op for RemoveRequest {
    type Error = AccessOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Revoked access grant {}", response.grant_id))
    }
}

#[async_trait::async_trait]
impl Op for CheckRequest {
    type Error = AccessOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(match response.role {
            Some(role) => role.to_string(),
            None => "no access".to_string(),
        })
    }
}
