use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{FileId, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Where a file's content can be downloaded from.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct UrlRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// File to act on
    #[arg(long)]
    pub file_id: FileId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResponse {
    /// `None` when no content was ever uploaded
    pub url: Option<Url>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<UrlRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let url = state
        .vault()
        .file_download_url(req.user_id, req.file_id)
        .await?;
    Ok((http::StatusCode::OK, Json(UrlResponse { url })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for UrlRequest {
    type Response = UrlResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/files/url").unwrap();
        client.post(full_url).json(&self)
    }
}
