use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomId, DataroomView, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Fetch a dataroom with the acting user's role on it.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<GetRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let view = state
        .vault()
        .get_dataroom(req.user_id, req.dataroom_id)
        .await?;
    Ok((http::StatusCode::OK, Json(view)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for GetRequest {
    type Response = DataroomView;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/datarooms/get").unwrap();
        client.post(full_url).json(&self)
    }
}
