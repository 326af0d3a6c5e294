use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FolderId, ItemCount, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Count the folders and files directly inside a folder.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CountRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Folder to act on
    #[arg(long)]
    pub folder_id: FolderId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CountRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let count = state
        .vault()
        .folder_item_count(req.user_id, req.folder_id)
        .await?;
    Ok((http::StatusCode::OK, Json(count)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for CountRequest {
    type Response = ItemCount;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/folders/count").unwrap();
        client.post(full_url).json(&self)
    }
}
