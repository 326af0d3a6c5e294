use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{DataroomId, FileRecord, FolderId, NewFile, StorageRef, UserId};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::VaultApiError;
use crate::ServiceState;

/// Register an uploaded PDF as a file record. Requires editor.
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Acting user
    #[arg(long, env = "DATAROOM_USER")]
    pub user_id: UserId,
    /// Dataroom to act on
    #[arg(long)]
    pub dataroom_id: DataroomId,
    /// Folder, omit for the dataroom root
    #[arg(long)]
    pub folder_id: Option<FolderId>,
    /// File name, unique among its siblings
    #[arg(long)]
    pub name: String,
    /// Ref from the upload ticket
    #[arg(long)]
    pub storage_ref: StorageRef,
    /// Content type, must be application/pdf
    #[arg(long, default_value = "application/pdf")]
    pub mime_type: String,
    /// Size in bytes
    #[arg(long)]
    pub size: u64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, VaultApiError> {
    let file = state
        .vault()
        .create_file(
            req.user_id,
            req.dataroom_id,
            NewFile {
                name: req.name,
                folder_id: req.folder_id,
                storage_ref: req.storage_ref,
                mime_type: req.mime_type,
                size: req.size,
            },
        )
        .await?;
    tracing::info!(file_id = %file.id, size = file.size, "file registered");
    Ok((http::StatusCode::CREATED, Json(file)).into_response())
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = FileRecord;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/files/create").unwrap();
        client.post(full_url).json(&self)
    }
}
