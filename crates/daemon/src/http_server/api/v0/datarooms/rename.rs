use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Dataroom, DataroomId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Rename a dataroom. Requires editor.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RenameRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
    /// New name
    #[arg(long)]
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RenameRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let dataroom = state
        .vault()
        .rename_dataroom(req.user_id, req.dataroom_id, &req.name)
        .await?;
    Ok((http::StatusCode::OK, Json(dataroom)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for RenameRequest {
    type Response = Dataroom;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/datarooms/rename").unwrap();
        client.post(full_url).json(&self)
    }
}
