//! Facade wiring the issuance core together.
//!
//! Transport layers hold one `TokenService` and call into it; every method is
//! synchronous and may block on the store and on password hashing.

use std::sync::Arc;

use tokengate_core::{AuthError, AuthResult, Clock};

use crate::authorize::{AccessPolicy, AuthenticatedPrincipal};
use crate::claims::ExtraClaims;
use crate::codec::{SigningKey, TokenCodec};
use crate::delegation::DelegatedIssuanceFlow;
use crate::issuer::{IssuedToken, TokenIssuer};
use crate::lockout::{AuthOutcome, LockoutTracker};
use crate::password::PasswordHasher;
use crate::principal::{Principal, PrincipalView};
use crate::repository::PrincipalRepository;
use crate::request::{DelegatedIssuanceRequest, LoginRequest, Registration};
use crate::roles::{Role, RoleSet};
use crate::verifier::CredentialVerifier;

#[derive(Clone)]
pub struct TokenService {
    repo: Arc<dyn PrincipalRepository>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: TokenIssuer,
    access: AccessPolicy,
    verifier: CredentialVerifier,
    lockout: LockoutTracker,
    delegation: DelegatedIssuanceFlow,
}

impl TokenService {
    pub fn new(
        repo: Arc<dyn PrincipalRepository>,
        hasher: Arc<dyn PasswordHasher>,
        key: &SigningKey,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(key));
        let issuer = TokenIssuer::new(codec.clone(), clock.clone());
        let access = AccessPolicy::new(codec, clock.clone());
        let lockout = LockoutTracker::new(repo.clone(), clock);
        let verifier = CredentialVerifier::new(repo.clone(), hasher.clone(), lockout.clone());
        let delegation = DelegatedIssuanceFlow::new(
            repo.clone(),
            verifier.clone(),
            issuer.clone(),
            lockout.clone(),
        );

        Self {
            repo,
            hasher,
            issuer,
            access,
            verifier,
            lockout,
            delegation,
        }
    }

    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    /// Password login. The token's subject is the username.
    pub fn login(&self, request: &LoginRequest) -> AuthResult<IssuedToken> {
        let req = request.validate()?;
        let principal = self.verifier.verify(req.username, req.password)?;

        let issued = self.issuer.issue(
            principal.username.clone(),
            principal.roles.clone(),
            req.duration,
            ExtraClaims::none(),
        )?;
        self.lockout
            .record(&principal, AuthOutcome::issued(issued.expires_at))?;

        Ok(issued)
    }

    pub fn issue_on_behalf(&self, request: &DelegatedIssuanceRequest) -> AuthResult<IssuedToken> {
        self.delegation.issue(request)
    }

    /// Register a new principal; the bearer token must carry `admin`.
    pub fn register(&self, admin_token: &str, registration: &Registration) -> AuthResult<PrincipalView> {
        let admin = self.access.require(admin_token, Role::Admin)?;
        let view = self.insert_principal(registration)?;
        tracing::info!(
            registered_by = %admin.subject,
            username = %view.username,
            principal_id = %view.id,
            "principal registered"
        );
        Ok(view)
    }

    /// Seed an administrator at startup. An existing username is left untouched.
    pub fn bootstrap_admin(
        &self,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> AuthResult<PrincipalView> {
        if let Some(existing) = self.repo.find_by_username(username)? {
            tracing::info!(username = %username, "bootstrap admin already present");
            return Ok(existing.view());
        }

        let registration = Registration {
            username: Some(username.to_string()),
            email: email.map(str::to_string),
            password: Some(password.to_string()),
            roles: Some(RoleSet::admin().to_strings()),
        };
        let view = self.insert_principal(&registration)?;
        tracing::info!(username = %view.username, principal_id = %view.id, "bootstrap admin created");
        Ok(view)
    }

    /// Decode the token and re-read its subject from the store.
    ///
    /// Delegated tokens carry a principal id, login tokens a username; see
    /// [`PrincipalRepository::find_by_reference`].
    pub fn current_principal(&self, token: &str) -> AuthResult<PrincipalView> {
        let authenticated = self.access.authenticate(token)?;
        self.resolve_subject(&authenticated)
    }

    pub fn resolve_subject(&self, authenticated: &AuthenticatedPrincipal) -> AuthResult<PrincipalView> {
        match self.repo.find_by_reference(&authenticated.subject)? {
            Some(principal) => Ok(principal.view()),
            None => {
                tracing::debug!(subject = %authenticated.subject, "token subject no longer resolves");
                Err(AuthError::Authentication)
            }
        }
    }

    fn insert_principal(&self, registration: &Registration) -> AuthResult<PrincipalView> {
        let valid = registration.validate()?;
        let hash = self.hasher.hash(valid.password)?;
        let principal = Principal::new(
            valid.username,
            valid.email.map(str::to_string),
            hash,
            valid.roles,
        );
        let view = principal.view();
        self.repo.insert(principal)?;
        Ok(view)
    }
}
