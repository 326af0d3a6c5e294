use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{AccessGrant, DataroomId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// List every grant on a dataroom. Requires admin.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub grants: Vec<AccessGrant>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ListRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let grants = state
        .vault()
        .list_access(req.user_id, req.dataroom_id)
        .await?;
    Ok((http::StatusCode::OK, Json(ListResponse { grants })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/access/list").unwrap();
        client.post(full_url).json(&self)
    }
}
