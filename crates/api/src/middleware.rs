use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use tokengate_auth::AccessPolicy;
use tokengate_core::AuthError;

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub access: AccessPolicy,
}

/// The raw bearer token of the current request.
///
/// Kept for operations that re-check the token themselves (registration).
#[derive(Clone)]
pub struct BearerToken(pub String);

/// Verify the bearer token and attach the authenticated principal to the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())
        .map_err(|_| errors::auth_error_to_response(AuthError::Authentication))?
        .to_string();

    let principal = state
        .access
        .authenticate(&token)
        .map_err(errors::auth_error_to_response)?;

    req.extensions_mut().insert(principal);
    req.extensions_mut().insert(BearerToken(token));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
