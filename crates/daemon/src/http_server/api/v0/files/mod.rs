use axum::routing::post;
use axum::Router;

pub mod create;
pub mod delete;
pub mod download_url;
pub mod get;
pub mod list;
pub mod rename;
pub mod upload_url;

pub use create::CreateRequest;
pub use delete::{DeleteRequest, DeleteResponse};
pub use download_url::{UrlRequest, UrlResponse};
pub use get::GetRequest;
pub use list::{ListRequest, ListResponse};
pub use rename::RenameRequest;
pub use upload_url::UploadUrlRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/list", post(list::handler))
        .route("/get", post(get::handler))
        .route("/url", post(download_url::handler))
        .route("/create", post(create::handler))
        .route("/rename", post(rename::handler))
        .route("/delete", post(delete::handler))
        .route("/upload-url", post(upload_url::handler))
        .with_state(state)
}
