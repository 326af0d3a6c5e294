use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::VaultError;

/// Body of every failed API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub msg: String,
}

/// A vault failure on its way out of a handler.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct VaultApiError(#[from] pub VaultError);

pub fn status_for(err: &VaultError) -> StatusCode {
    match err {
        VaultError::InvalidCredentials | VaultError::UserNotFound => StatusCode::UNAUTHORIZED,
        VaultError::AccessDenied | VaultError::InsufficientPermissions { .. } => {
            StatusCode::FORBIDDEN
        }
        VaultError::NotFound(_) => StatusCode::NOT_FOUND,
        VaultError::DuplicateName(_)
        | VaultError::DuplicateAccess
        | VaultError::DuplicateEmail
        | VaultError::StorageRefInUse
        | VaultError::ImmutableOwner => StatusCode::CONFLICT,
        VaultError::InvalidName(_) | VaultError::InvalidMimeType(_) | VaultError::InvalidRole(_) => {
            StatusCode::BAD_REQUEST
        }
        VaultError::Store(_) | VaultError::Blobs(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for VaultApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(&err);

        let msg = if err.is_internal() {
            tracing::error!(code = err.code(), "request failed: {}", err);
            err.user_message()
        } else {
            tracing::debug!(code = err.code(), "request rejected: {}", err);
            err.to_string()
        };

        (
            status,
            Json(ErrorResponse {
                code: err.code().to_string(),
                msg,
            }),
        )
            .into_response()
    }
}
