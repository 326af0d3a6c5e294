use clap::{Args, Subcommand};

use common::prelude::UserProfile;
use dataroom_daemon::http_server::api::client::ApiError;
use dataroom_daemon::http_server::api::v0::auth::{LoginRequest, SignupRequest, UserRequest};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Signup, SignupRequest),
    (Login, LoginRequest),
    (Show, UserRequest),
}

pub type UserCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[async_trait::async_trait]
impl Op for User {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

fn describe(profile: &UserProfile) -> String {
    format!(
        "{} <{}>\n  id:     {}\n  joined: {}",
        profile.full_name,
        profile.email,
        profile.id,
        profile.created_at.date()
    )
}

#[async_trait::async_trait]
impl Op for SignupRequest {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let profile = client.call(self.clone()).await?;
        Ok(format!(
            "Signed up {}\n\nexport DATAROOM_USER={}",
            describe(&profile),
            profile.id
        ))
    }
}

#[async_trait::async_trait]
impl Op for LoginRequest {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let profile = client.call(self.clone()).await?;
        Ok(format!(
            "Logged in as {}\n\nexport DATAROOM_USER={}",
            describe(&profile),
            profile.id
        ))
    }
}

#[async_trait::async_trait]
impl Op for UserRequest {
    type Error = UserOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(match response.user {
            Some(profile) => describe(&profile),
            None => format!("No user with id {}", self.user_id),
        })
    }
}
