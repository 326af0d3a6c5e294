use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{UploadTicket, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Issue an upload ticket for new file content.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct UploadUrlRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<UploadUrlRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let ticket = state.vault().generate_upload_url(req.user_id).await?;
    Ok((http::StatusCode::OK, Json(ticket)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for UploadUrlRequest {
    type Response = UploadTicket;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/files/upload-url").unwrap();
        client.post(full_url).json(&self)
    }
}
