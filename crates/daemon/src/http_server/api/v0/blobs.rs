//! Content endpoints behind the URLs the blob storage hands out.
//!
//! Upload tickets act as the authorization: holding a ref that was issued
//! by `files/upload-url` is enough to push content to it once.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use url::Url;

use common::names::PDF_MIME_TYPE;
use common::prelude::{BlobStorage, StorageRef};

use crate::blobs::BlobStorageError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub storage_ref: StorageRef,
    pub size: u64,
    /// Where the content can now be downloaded from
    pub url: Option<Url>,
}

pub async fn upload_handler(
    State(state): State<ServiceState>,
    Path(storage_ref): Path<StorageRef>,
    body: Bytes,
) -> Result<impl IntoResponse, BlobsError> {
    if body.is_empty() {
        return Err(BlobsError::EmptyBody);
    }

    let size = state.blobs().put(storage_ref, body).await?;
    let url = state.blobs().get_url(storage_ref).await?;
    tracing::info!(%storage_ref, size, "blob uploaded");

    Ok((
        http::StatusCode::OK,
        Json(UploadResponse {
            storage_ref,
            size,
            url,
        }),
    )
        .into_response())
}

pub async fn download_handler(
    State(state): State<ServiceState>,
    Path(storage_ref): Path<StorageRef>,
) -> Result<impl IntoResponse, BlobsError> {
    let data = state
        .blobs()
        .get(storage_ref)
        .await?
        .ok_or(BlobsError::NotFound(storage_ref))?;

    Ok((
        http::StatusCode::OK,
        [(CONTENT_TYPE, PDF_MIME_TYPE)],
        data,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum BlobsError {
    #[error("No content for storage ref {0}")]
    NotFound(StorageRef),
    #[error("Upload body is empty")]
    EmptyBody,
    #[error("Blob storage error: {0}")]
    Storage(#[from] BlobStorageError),
}

impl IntoResponse for BlobsError {
    fn into_response(self) -> Response {
        match self {
            BlobsError::NotFound(_) => {
                (http::StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            BlobsError::EmptyBody => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            BlobsError::Storage(BlobStorageError::UnknownRef(storage_ref)) => (
                http::StatusCode::NOT_FOUND,
                format!("Storage ref was never issued: {}", storage_ref),
            )
                .into_response(),
            BlobsError::Storage(BlobStorageError::AlreadyUploaded(storage_ref)) => (
                http::StatusCode::CONFLICT,
                format!("Storage ref already holds content: {}", storage_ref),
            )
                .into_response(),
            BlobsError::Storage(e) => {
                tracing::error!("BLOB ERROR: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Blob storage error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
