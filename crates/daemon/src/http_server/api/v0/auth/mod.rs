use axum::routing::post;
use axum::Router;

pub mod login;
pub mod signup;
pub mod user;

pub use login::LoginRequest;
pub use signup::SignupRequest;
pub use user::{UserRequest, UserResponse};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/signup", post(signup::handler))
        .route("/login", post(login::handler))
        .route("/user", post(user::handler))
        .with_state(state)
}
