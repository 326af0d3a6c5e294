use axum::routing::post;
use axum::Router;

pub mod access;
pub mod auth;
pub mod blobs;
pub mod datarooms;
pub mod error;
pub mod files;
pub mod folders;
pub mod search;

pub use error::VaultApiError;
pub use search::{SearchRequest, SearchResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/datarooms", datarooms::router(state.clone()))
        .nest("/access", access::router(state.clone()))
        .nest("/folders", folders::router(state.clone()))
        .nest("/files", files::router(state.clone()))
        .route("/search", post(search::handler))
        .route(
            "/blobs/:storage_ref",
            post(blobs::upload_handler).get(blobs::download_handler),
        )
        .with_state(state)
}
