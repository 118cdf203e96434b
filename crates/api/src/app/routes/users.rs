use std::sync::Arc;

use axum::{
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use tokengate_auth::{AuthenticatedPrincipal, Registration, Role, TokenService, authorize};

use crate::app::{dto::MessageResponse, errors, run_blocking};
use crate::middleware::BearerToken;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
        .route("/admin-data", get(admin_data))
        .route("/user-data", get(user_data))
}

/// POST /users/register - admin-only principal registration
pub async fn register(
    Extension(service): Extension<Arc<TokenService>>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    body: Result<Json<Registration>, JsonRejection>,
) -> Response {
    let Json(reg) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", e.body_text()),
    };

    match run_blocking(move || service.register(&token, &reg)).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(resp) => resp,
    }
}

/// GET /users/me - the stored principal behind the presented token
pub async fn me(
    Extension(service): Extension<Arc<TokenService>>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
) -> Response {
    match run_blocking(move || service.resolve_subject(&principal)).await {
        Ok(view) => Json(view).into_response(),
        Err(resp) => resp,
    }
}

pub async fn admin_data(Extension(principal): Extension<AuthenticatedPrincipal>) -> Response {
    gated(&principal, Role::Admin, "This is admin data.")
}

pub async fn user_data(Extension(principal): Extension<AuthenticatedPrincipal>) -> Response {
    gated(&principal, Role::User, "This is user data.")
}

fn gated(principal: &AuthenticatedPrincipal, required: Role, message: &'static str) -> Response {
    match authorize(&principal.roles, required) {
        Ok(()) => Json(MessageResponse { message }).into_response(),
        Err(e) => {
            tracing::info!(subject = %principal.subject, required = %required, "access denied");
            errors::auth_error_to_response(e)
        }
    }
}
