use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{UserId, UserProfile};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Look up a user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct UserRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// `None` when no such user exists
    pub user: Option<UserProfile>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<UserRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let user = state.vault().get_user(req.user_id).await?;
    Ok((http::StatusCode::OK, Json(UserResponse { user })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for UserRequest {
    type Response = UserResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/auth/user").unwrap();
        client.post(full_url).json(&self)
    }
}
