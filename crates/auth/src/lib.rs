//! `tokengate-auth`: credential verification and token issuance core.
//!
//! This crate is intentionally decoupled from HTTP and from any concrete store:
//! storage comes in through [`PrincipalRepository`], time through
//! [`tokengate_core::Clock`].

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod delegation;
pub mod duration;
pub mod issuer;
pub mod lockout;
pub mod password;
pub mod principal;
pub mod repository;
pub mod request;
pub mod roles;
pub mod service;
pub mod verifier;

#[cfg(test)]
mod test_support;

pub use authorize::{AccessPolicy, AuthenticatedPrincipal, authorize};
pub use claims::{ExtraClaims, TokenClaims, validate_claims};
pub use codec::{MIN_SIGNING_KEY_LEN, SigningKey, TokenCodec};
pub use delegation::DelegatedIssuanceFlow;
pub use duration::DurationTag;
pub use issuer::{IssuedToken, TokenIssuer};
pub use lockout::{AuthOutcome, LockoutRecord, LockoutTracker};
pub use password::{Argon2PasswordHasher, MIN_PASSWORD_LEN, PasswordHasher};
pub use principal::{Principal, PrincipalId, PrincipalView};
pub use repository::PrincipalRepository;
pub use request::{DelegatedIssuanceRequest, LoginRequest, Registration};
pub use roles::{Role, RoleSet};
pub use service::TokenService;
pub use verifier::CredentialVerifier;
