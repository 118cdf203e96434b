//! Role-based access checks for presented tokens.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tokengate_core::{AuthError, AuthResult, Clock};

use crate::codec::TokenCodec;
use crate::roles::{Role, RoleSet};

/// Identity established from a verified, unexpired token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub subject: String,
    pub roles: RoleSet,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedPrincipal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}

/// Pure set-membership check: no hierarchy, no wildcard.
pub fn authorize(roles: &RoleSet, required: Role) -> AuthResult<()> {
    if roles.contains(required) {
        Ok(())
    } else {
        Err(AuthError::authorization(required.as_str()))
    }
}

/// Decodes presented tokens and gates operations on a required role.
#[derive(Clone)]
pub struct AccessPolicy {
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl AccessPolicy {
    pub fn new(codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, clock }
    }

    /// Verify the token; any decode failure surfaces as `Authentication`.
    pub fn authenticate(&self, token: &str) -> AuthResult<AuthenticatedPrincipal> {
        let claims = self
            .codec
            .decode(token, self.clock.now())
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AuthError::Authentication
            })?;

        Ok(AuthenticatedPrincipal {
            subject: claims.sub,
            roles: claims.roles,
            email: claims.email,
            expires_at: claims.exp,
        })
    }

    pub fn require(&self, token: &str, required: Role) -> AuthResult<AuthenticatedPrincipal> {
        let principal = self.authenticate(token)?;
        if let Err(e) = authorize(&principal.roles, required) {
            tracing::info!(subject = %principal.subject, required = %required, "access denied");
            return Err(e);
        }
        Ok(principal)
    }
}
