use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{GrantId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Revoke a non-owner grant. Requires admin.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RemoveRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Access grant to act on
    #[arg(long)]
    pub grant_id: GrantId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub grant_id: GrantId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RemoveRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    state
        .vault()
        .remove_access(req.user_id, req.grant_id)
        .await?;
    tracing::info!(grant_id = %req.grant_id, "access revoked");
    Ok((
        http::StatusCode::OK,
        Json(RemoveResponse {
            grant_id: req.grant_id,
        }),
    )
        .into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for RemoveRequest {
    type Response = RemoveResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/access/remove").unwrap();
        client.post(full_url).json(&self)
    }
}
