//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, response::Response, routing::get};
use tower::ServiceBuilder;

use tokengate_auth::TokenService;
use tokengate_core::AuthResult;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(service: TokenService) -> Router {
    let auth_state = middleware::AuthState {
        access: service.access().clone(),
    };
    let service = Arc::new(service);

    let protected = routes::protected().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(service)))
}

/// Run a core operation off the async executor.
///
/// Password hashing is CPU-bound and store calls may block.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, Response>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(errors::auth_error_to_response(e)),
        Err(e) => Err(errors::join_error_to_response(e)),
    }
}
