use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{SearchResult, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Everything the acting user can reach, with display paths.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct SearchRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let results = state.vault().search_all(req.user_id).await?;
    Ok((http::StatusCode::OK, Json(SearchResponse { results })).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for SearchRequest {
    type Response = SearchResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/search").unwrap();
        client.post(full_url).json(&self)
    }
}
