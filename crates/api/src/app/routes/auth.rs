//! Token issuance endpoints (no bearer token required).

use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use tokengate_auth::{DelegatedIssuanceRequest, LoginRequest, TokenService};

use crate::app::{dto::TokenResponse, errors, run_blocking};

pub fn router() -> Router {
    Router::new()
        .route("/token", post(login))
        .route("/token/delegate", post(issue_on_behalf))
}

/// POST /auth/token - password login
pub async fn login(
    Extension(service): Extension<Arc<TokenService>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()),
    };

    match run_blocking(move || service.login(&req)).await {
        Ok(issued) => Json(TokenResponse::from(issued)).into_response(),
        Err(resp) => resp,
    }
}

/// POST /auth/token/delegate - admin mints a token on behalf of a target principal
pub async fn issue_on_behalf(
    Extension(service): Extension<Arc<TokenService>>,
    body: Result<Json<DelegatedIssuanceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()),
    };

    match run_blocking(move || service.issue_on_behalf(&req)).await {
        Ok(issued) => Json(TokenResponse::from(issued)).into_response(),
        Err(resp) => resp,
    }
}
