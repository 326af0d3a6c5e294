use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomId, Folder, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// List every folder of a dataroom, at any depth.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct AllRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllResponse {
    pub folders: Vec<Folder>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<AllRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let folders = state
        .vault()
        .list_all_folders(req.user_id, req.dataroom_id)
        .await?;
    Ok((http::StatusCode::OK, Json(AllResponse { folders })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for AllRequest {
    type Response = AllResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/folders/all").unwrap();
        client.post(full_url).json(&self)
    }
}
