use std::sync::Arc;

use chrono::{DateTime, Utc};

use tokengate_core::{AuthResult, Clock};

use crate::claims::{ExtraClaims, TokenClaims};
use crate::codec::TokenCodec;
use crate::duration::DurationTag;
use crate::roles::RoleSet;

/// A freshly minted token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
    pub expires_at: DateTime<Utc>,
    /// Whole minutes left, sampled after signing; one below nominal is normal.
    pub remaining_minutes: i64,
}

/// Mints tokens for a subject with a policy-selected lifetime.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, clock }
    }

    pub fn issue(
        &self,
        subject: impl Into<String>,
        roles: RoleSet,
        duration: DurationTag,
        extra: ExtraClaims,
    ) -> AuthResult<IssuedToken> {
        let issued_at = self.clock.now();
        let expires_at = issued_at + duration.duration();

        let claims = TokenClaims {
            sub: subject.into(),
            roles,
            iat: issued_at,
            exp: expires_at,
            email: extra.email,
        };
        let token = self.codec.encode(&claims)?;

        let remaining_minutes = (expires_at - self.clock.now()).num_seconds().div_euclid(60);

        tracing::info!(
            subject = %claims.sub,
            duration = %duration,
            expires_at = %expires_at,
            "token issued"
        );

        Ok(IssuedToken {
            token,
            claims,
            expires_at,
            remaining_minutes,
        })
    }
}
