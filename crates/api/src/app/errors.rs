use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use tokengate_core::AuthError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    let mut response = (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response();

    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

/// Map a core error onto its HTTP status and JSON body.
pub fn auth_error_to_response(err: AuthError) -> Response {
    let kind = err.kind();
    let status =
        StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match &err {
        AuthError::Storage(e) => {
            tracing::error!(error = %e, "principal store failure");
            "service temporarily unavailable".to_string()
        }
        other => other.to_string(),
    };

    json_error(status, kind.code(), message)
}

/// A blocking task panicked or was cancelled.
pub fn join_error_to_response(err: tokio::task::JoinError) -> Response {
    tracing::error!(error = %err, "blocking task failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokengate_core::StorageError;

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let res = auth_error_to_response(AuthError::Authentication);
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn status_mapping_follows_error_kind() {
        let cases = [
            (AuthError::validation("x"), StatusCode::BAD_REQUEST),
            (AuthError::MissingFields(vec!["a".into()]), StatusCode::BAD_REQUEST),
            (AuthError::configuration("x"), StatusCode::BAD_REQUEST),
            (AuthError::authorization("admin"), StatusCode::FORBIDDEN),
            (AuthError::not_found("x"), StatusCode::NOT_FOUND),
            (AuthError::Conflict("x".into()), StatusCode::CONFLICT),
            (AuthError::Authentication, StatusCode::UNAUTHORIZED),
            (
                AuthError::Storage(StorageError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            let res = auth_error_to_response(err);
            assert_eq!(res.status(), status);
            assert_eq!(
                res.headers().contains_key(header::WWW_AUTHENTICATE),
                status == StatusCode::UNAUTHORIZED
            );
        }
    }
}
