use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{AccessGrant, DataroomId, Role, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Grant a role on a dataroom to an email address. Requires admin.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct InviteRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
    /// Invitee's email address
    #[arg(long)]
    pub email: String,
    /// admin, editor or viewer
    #[arg(long)]
    pub role: Role,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let grant = state
        .vault()
        .invite_access(req.user_id, req.dataroom_id, &req.email, req.role)
        .await?;
    tracing::info!(grant_id = %grant.id, role = %grant.role, "access granted");
    Ok((http::StatusCode::CREATED, Json(grant)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for InviteRequest {
    type Response = AccessGrant;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/access/invite").unwrap();
        client.post(full_url).json(&self)
    }
}
