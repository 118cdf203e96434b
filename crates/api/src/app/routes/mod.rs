use axum::Router;

pub mod auth;
pub mod system;
pub mod users;

/// Router for all endpoints that require a bearer token.
pub fn protected() -> Router {
    Router::new().nest("/users", users::router())
}

/// Router for endpoints reachable without a token.
pub fn public() -> Router {
    Router::new().nest("/auth", auth::router())
}
