use std::sync::{Arc, OnceLock};

use tokengate_core::{AuthError, AuthResult};

use crate::lockout::{AuthOutcome, LockoutTracker};
use crate::password::PasswordHasher;
use crate::principal::Principal;
use crate::repository::PrincipalRepository;

/// Checks a username/password pair against the store.
///
/// Unknown usernames and wrong passwords produce the same `Authentication`
/// error. Every call against an existing principal records exactly one lockout
/// update before returning.
#[derive(Clone)]
pub struct CredentialVerifier {
    repo: Arc<dyn PrincipalRepository>,
    hasher: Arc<dyn PasswordHasher>,
    lockout: LockoutTracker,
    decoy_hash: Arc<OnceLock<Option<String>>>,
}

impl CredentialVerifier {
    pub fn new(
        repo: Arc<dyn PrincipalRepository>,
        hasher: Arc<dyn PasswordHasher>,
        lockout: LockoutTracker,
    ) -> Self {
        Self {
            repo,
            hasher,
            lockout,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub fn verify(&self, username: &str, plaintext: &str) -> AuthResult<Principal> {
        let Some(mut principal) = self.repo.find_by_username(username)? else {
            self.burn_decoy(plaintext);
            tracing::warn!(username = %username, "authentication failed: unknown principal");
            return Err(AuthError::Authentication);
        };

        if !self.hasher.verify(plaintext, &principal.password_hash)? {
            self.lockout.record(&principal, AuthOutcome::Failure)?;
            return Err(AuthError::Authentication);
        }

        if let Some(record) = self.lockout.record(&principal, AuthOutcome::success())? {
            principal.lockout = record;
        }
        Ok(principal)
    }

    // Unknown usernames still pay for one hash verification so response time
    // does not reveal whether the account exists.
    fn burn_decoy(&self, plaintext: &str) {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.hasher.hash("tokengate-decoy-credential").ok());
        if let Some(hash) = decoy {
            let _ = self.hasher.verify(plaintext, hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, RepoCall};
    use tokengate_core::Clock;

    #[test]
    fn correct_password_returns_principal_and_records_success() {
        let fx = Fixture::new();
        let alice = fx.verifier().verify("alice", "password123").unwrap();

        assert_eq!(alice.username, "alice");
        assert_eq!(alice.lockout.failed_count, 0);
        assert_eq!(alice.lockout.last_success_at, Some(fx.clock.now()));
        assert_eq!(fx.repo.outcome_updates_for(alice.id), 1);
    }

    #[test]
    fn wrong_password_and_unknown_user_are_indistinguishable() {
        let fx = Fixture::new();
        let wrong = fx.verifier().verify("alice", "nope").unwrap_err();
        let unknown = fx.verifier().verify("nobody", "nope").unwrap_err();

        assert_eq!(wrong, AuthError::Authentication);
        assert_eq!(unknown, AuthError::Authentication);
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn wrong_password_records_exactly_one_failure() {
        let fx = Fixture::new();
        let alice_id = fx.principal("alice").id;
        fx.repo.clear_calls();

        let _ = fx.verifier().verify("alice", "nope");

        let calls = fx.repo.calls();
        assert_eq!(
            calls,
            vec![
                RepoCall::FindByUsername("alice".into()),
                RepoCall::UpdateAuthOutcome(alice_id, AuthOutcome::Failure),
            ]
        );
        assert_eq!(fx.principal("alice").lockout.failed_count, 1);
    }

    #[test]
    fn n_failures_then_success_resets_counter() {
        let fx = Fixture::new();
        for _ in 0..4 {
            let _ = fx.verifier().verify("alice", "nope");
        }
        assert_eq!(fx.principal("alice").lockout.failed_count, 4);

        fx.verifier().verify("alice", "password123").unwrap();
        assert_eq!(fx.principal("alice").lockout.failed_count, 0);
    }

    #[test]
    fn storage_failure_propagates() {
        let fx = Fixture::new();
        fx.repo.fail_next("disk on fire");
        let err = fx.verifier().verify("alice", "password123").unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
    }
}
