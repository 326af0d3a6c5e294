use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FileId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Delete a file record and its content. Requires editor.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// File to act on
    #[arg(long)]
    pub file_id: FileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub file_id: FileId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<DeleteRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    state.vault().delete_file(req.user_id, req.file_id).await?;
    tracing::info!(file_id = %req.file_id, "file deleted");
    Ok((
        http::StatusCode::OK,
        Json(DeleteResponse {
            file_id: req.file_id,
        }),
    )
        .into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/files/delete").unwrap();
        client.post(full_url).json(&self)
    }
}
