use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Crumb, DataroomId, FolderId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Breadcrumb from the dataroom root down to a folder.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct PathRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
    /// Folder to act on
    #[arg(long)]
    pub folder_id: FolderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    /// Root first; empty when the folder isn't in the dataroom
    pub path: Vec<Crumb>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<PathRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let path = state
        .vault()
        .breadcrumb_path(req.user_id, req.dataroom_id, req.folder_id)
        .await?;
    Ok((http::StatusCode::OK, Json(PathResponse { path })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for PathRequest {
    type Response = PathResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/folders/path").unwrap();
        client.post(full_url).json(&self)
    }
}
