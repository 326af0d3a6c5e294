use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::UserProfile;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SignupRequest {
    /// Display name
    #[arg(long)]
    pub full_name: String,
    /// Email address, unique across users
    #[arg(long)]
    pub email: String,
    /// Credential, compared exactly at login
    #[arg(long)]
    pub password: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let profile = state
        .vault()
        .signup(&req.full_name, &req.email, &req.password)
        .await?;
    tracing::info!(user_id = %profile.id, "user signed up");
    Ok((http::StatusCode::CREATED, Json(profile)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for SignupRequest {
    type Response = UserProfile;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/auth/signup").unwrap();
        client.post(full_url).json(&self)
    }
}
