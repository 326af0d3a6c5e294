use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomView, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Create a dataroom owned by the acting user.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Name of the dataroom, unique per owner ignoring case
    #[arg(long)]
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let view = state.vault().create_dataroom(req.user_id, &req.name).await?;
    tracing::info!(dataroom_id = %view.dataroom.id, "dataroom created");
    Ok((http::StatusCode::CREATED, Json(view)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = DataroomView;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/datarooms/create").unwrap();
        client.post(full_url).json(&self)
    }
}
