use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{AccessGrant, GrantId, Role, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Change the role of a non-owner grant. Requires admin.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RoleRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Access grant to act on
    #[arg(long)]
    pub grant_id: GrantId,
    /// admin, editor or viewer
    #[arg(long)]
    pub role: Role,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RoleRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let grant = state
        .vault()
        .update_access_role(req.user_id, req.grant_id, req.role)
        .await?;
    Ok((http::StatusCode::OK, Json(grant)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for RoleRequest {
    type Response = AccessGrant;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/access/role").unwrap();
        client.post(full_url).json(&self)
    }
}
