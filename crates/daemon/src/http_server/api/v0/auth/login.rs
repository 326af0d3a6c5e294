use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::UserProfile;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Exchange credentials for the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LoginRequest {
    /// Email address
    #[arg(long)]
    pub email: String,
    /// Credential
    #[arg(long)]
    pub password: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let profile = state.vault().login(&req.email, &req.password).await?;
    Ok((http::StatusCode::OK, Json(profile)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for LoginRequest {
    type Response = UserProfile;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/auth/login").unwrap();
        client.post(full_url).json(&self)
    }
}
