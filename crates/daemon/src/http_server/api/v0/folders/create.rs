use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomId, Folder, FolderId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Create a folder. Requires editor.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
    /// Parent folder, omit for the dataroom root
    #[arg(long)]
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among its siblings
    #[arg(long)]
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let folder = state
        .vault()
        .create_folder(req.user_id, req.dataroom_id, req.parent_id, &req.name)
        .await?;
    Ok((http::StatusCode::CREATED, Json(folder)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = Folder;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/folders/create").unwrap();
        client.post(full_url).json(&self)
    }
}
