use axum::routing::post;
use axum::Router;

pub mod check;
pub mod invite;
pub mod list;
pub mod remove;
pub mod role;

pub use check::{CheckRequest, CheckResponse};
pub use invite::InviteRequest;
pub use list::{ListRequest, ListResponse};
pub use remove::{RemoveRequest, RemoveResponse};
pub use role::RoleRequest;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/invite", post(invite::handler))
        .route("/list", post(list::handler))
        .route("/role", post(role::handler))
        .route("/remove", post(remove::handler))
        .route("/check", post(check::handler))
        .with_state(state)
}
