use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FileId, FileRecord, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Rename a file. Requires editor.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RenameRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// File to act on
    #[arg(long)]
    pub file_id: FileId,
    /// New name
    #[arg(long)]
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RenameRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let file = state
        .vault()
        .rename_file(req.user_id, req.file_id, &req.name)
        .await?;
    Ok((http::StatusCode::OK, Json(file)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for RenameRequest {
    type Response = FileRecord;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/files/rename").unwrap();
        client.post(full_url).json(&self)
    }
}
