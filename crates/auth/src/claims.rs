use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokengate_core::TokenError;

use crate::roles::RoleSet;

/// Signed token payload.
///
/// `sub` names the principal the token speaks for, which in delegated issuance
/// differs from the principal that authenticated. `iat`/`exp` are encoded as
/// numeric Unix timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,

    /// Role snapshot taken at issuance.
    pub roles: RoleSet,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Optional claims attached on top of `sub`/`roles`/`iat`/`exp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraClaims {
    pub email: Option<String>,
}

impl ExtraClaims {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

/// Check the claim time window against `now`.
///
/// Signature verification happens in the codec; this only looks at the payload.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::Malformed(
            "invalid token time window (exp <= iat)".to_string(),
        ));
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
