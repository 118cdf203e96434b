use serde::Serialize;

use tokengate_auth::IssuedToken;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token_type: &'static str,
    pub access_token: String,
    pub expires_in_minutes: i64,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token_type: "bearer",
            access_token: issued.token,
            expires_in_minutes: issued.remaining_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
