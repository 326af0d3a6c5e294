use axum::routing::post;
use axum::Router;

pub mod count;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod rename;

pub use count::CountRequest;
pub use create::CreateRequest;
pub use delete::DeleteRequest;
pub use get::GetRequest;
pub use list::{ListRequest, ListResponse};
pub use rename::RenameRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/create", post(create::handler))
        .route("/list", post(list::handler))
        .route("/get", post(get::handler))
        .route("/rename", post(rename::handler))
        .route("/delete", post(delete::handler))
        .route("/count", post(count::handler))
        .with_state(state)
}
