use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomId, Role, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// The acting user's role on a dataroom, if any.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CheckRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// `None` when the user holds no grant
    pub role: Option<Role>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CheckRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let role = state
        .vault()
        .check_access(req.user_id, req.dataroom_id)
        .await?;
    Ok((http::StatusCode::OK, Json(CheckResponse { role })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for CheckRequest {
    type Response = CheckResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/access/check").unwrap();
        client.post(full_url).json(&self)
    }
}
