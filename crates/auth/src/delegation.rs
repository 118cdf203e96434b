//! Admin-on-behalf-of-target token issuance.
//!
//! The step order is part of the contract because it fixes which error a caller
//! sees first:
//!
//! 1. structural validation (missing fields, duration tag), no store access
//! 2. resolve the principal owning the claimed email (`NotFound`)
//! 3. that principal's username must equal the claimed username (`Validation`)
//! 4. verify the requester's credentials, recording one lockout update (`Authentication`)
//! 5. requester must hold `admin` (`Authorization`)
//! 6. resolve the target (`NotFound`)
//! 7. mint a token with the target's id and roles, carrying the claimed email
//! 8. record the issuance against the target, not the requester
//!
//! Steps 2 and 3 run before any credential check, so an unauthenticated caller
//! can learn whether an email belongs to a username. See DESIGN.md.

use std::sync::Arc;

use tokengate_core::{AuthError, AuthResult};

use crate::authorize::authorize;
use crate::claims::ExtraClaims;
use crate::issuer::{IssuedToken, TokenIssuer};
use crate::lockout::{AuthOutcome, LockoutTracker};
use crate::repository::PrincipalRepository;
use crate::request::DelegatedIssuanceRequest;
use crate::roles::Role;
use crate::verifier::CredentialVerifier;

#[derive(Clone)]
pub struct DelegatedIssuanceFlow {
    repo: Arc<dyn PrincipalRepository>,
    verifier: CredentialVerifier,
    issuer: TokenIssuer,
    lockout: LockoutTracker,
}

impl DelegatedIssuanceFlow {
    pub fn new(
        repo: Arc<dyn PrincipalRepository>,
        verifier: CredentialVerifier,
        issuer: TokenIssuer,
        lockout: LockoutTracker,
    ) -> Self {
        Self {
            repo,
            verifier,
            issuer,
            lockout,
        }
    }

    pub fn issue(&self, request: &DelegatedIssuanceRequest) -> AuthResult<IssuedToken> {
        let req = request.validate()?;

        let owner = self
            .repo
            .find_by_email(req.email)?
            .ok_or_else(|| AuthError::not_found("no principal with this email"))?;

        if owner.username != req.username {
            return Err(AuthError::validation("email not associated with username"));
        }

        let requester = self.verifier.verify(req.username, req.password)?;
        authorize(&requester.roles, Role::Admin)?;

        let target = self
            .repo
            .find_by_reference(req.target)?
            .ok_or_else(|| AuthError::not_found("target principal not found"))?;

        let issued = self.issuer.issue(
            target.id.to_string(),
            target.roles.clone(),
            req.duration,
            ExtraClaims::with_email(req.email),
        )?;

        self.lockout
            .record(&target, AuthOutcome::issued(issued.expires_at))?;

        tracing::info!(
            requester = %requester.username,
            target = %target.username,
            target_id = %target.id,
            duration = %req.duration,
            "delegated token issued"
        );

        Ok(issued)
    }
}
