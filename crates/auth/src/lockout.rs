//! Failed-authentication bookkeeping.
//!
//! The tracker only maintains counters and timestamps. It does not block a
//! principal after N failures; a threshold, if the product needs one, is the
//! caller's decision.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokengate_core::{AuthResult, Clock};

use crate::principal::Principal;
use crate::repository::PrincipalRepository;

/// The mutable lockout subset of a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    pub failed_count: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub token_created_at: Option<DateTime<Utc>>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

/// Result of one authentication attempt or issuance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Failure,
    /// `token_expires_at` is set when a token was minted for this principal.
    Success {
        token_expires_at: Option<DateTime<Utc>>,
    },
}

impl AuthOutcome {
    pub fn success() -> Self {
        AuthOutcome::Success {
            token_expires_at: None,
        }
    }

    pub fn issued(token_expires_at: DateTime<Utc>) -> Self {
        AuthOutcome::Success {
            token_expires_at: Some(token_expires_at),
        }
    }
}

impl LockoutRecord {
    /// Apply an outcome observed at `at`.
    ///
    /// Stores must call this inside their atomic update primitive; it is never
    /// meant to be used as a get-modify-put sequence across calls.
    pub fn apply(&mut self, outcome: AuthOutcome, at: DateTime<Utc>) {
        match outcome {
            AuthOutcome::Failure => {
                self.failed_count = self.failed_count.saturating_add(1);
                self.last_failure_at = Some(at);
            }
            AuthOutcome::Success { token_expires_at } => {
                self.failed_count = 0;
                self.last_success_at = Some(at);
                if let Some(expires_at) = token_expires_at {
                    self.token_created_at = Some(at);
                    self.token_expires_at = Some(expires_at);
                }
            }
        }
    }
}

/// Records authentication outcomes through the store's atomic update primitive.
#[derive(Clone)]
pub struct LockoutTracker {
    repo: Arc<dyn PrincipalRepository>,
    clock: Arc<dyn Clock>,
}

impl LockoutTracker {
    pub fn new(repo: Arc<dyn PrincipalRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Record `outcome` for `principal`.
    ///
    /// Returns the record as stored after the update, or `None` when the principal
    /// was removed from the store in the meantime.
    pub fn record(
        &self,
        principal: &Principal,
        outcome: AuthOutcome,
    ) -> AuthResult<Option<LockoutRecord>> {
        let at = self.clock.now();
        let updated = self.repo.update_auth_outcome(principal.id, outcome, at)?;

        match (&updated, outcome) {
            (None, _) => {
                tracing::warn!(principal_id = %principal.id, "lockout update for vanished principal");
            }
            (Some(record), AuthOutcome::Failure) => {
                tracing::warn!(
                    principal_id = %principal.id,
                    username = %principal.username,
                    failed_count = record.failed_count,
                    "authentication failed"
                );
            }
            (Some(_), AuthOutcome::Success { token_expires_at }) => {
                tracing::debug!(
                    principal_id = %principal.id,
                    token_expires_at = ?token_expires_at,
                    "authentication outcome recorded"
                );
            }
        }

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn failure_increments_and_leaves_issuance_fields() {
        let t0 = Utc::now();
        let mut record = LockoutRecord {
            token_created_at: Some(t0),
            token_expires_at: Some(t0 + Duration::days(1)),
            ..Default::default()
        };

        record.apply(AuthOutcome::Failure, t0 + Duration::seconds(5));

        assert_eq!(record.failed_count, 1);
        assert_eq!(record.last_failure_at, Some(t0 + Duration::seconds(5)));
        assert_eq!(record.token_created_at, Some(t0));
        assert_eq!(record.token_expires_at, Some(t0 + Duration::days(1)));
    }

    #[test]
    fn plain_success_resets_counter_without_touching_token_fields() {
        let t0 = Utc::now();
        let mut record = LockoutRecord {
            failed_count: 3,
            ..Default::default()
        };

        record.apply(AuthOutcome::success(), t0);

        assert_eq!(record.failed_count, 0);
        assert_eq!(record.last_success_at, Some(t0));
        assert!(record.token_created_at.is_none());
        assert!(record.token_expires_at.is_none());
    }

    #[test]
    fn issuance_success_sets_token_fields() {
        let t0 = Utc::now();
        let exp = t0 + Duration::weeks(1);
        let mut record = LockoutRecord::default();

        record.apply(AuthOutcome::issued(exp), t0);

        assert_eq!(record.token_created_at, Some(t0));
        assert_eq!(record.token_expires_at, Some(exp));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// N consecutive failures yield failed_count == N; a success resets it.
        #[test]
        fn failures_count_exactly_and_success_resets(n in 0u32..200) {
            let t0 = Utc::now();
            let mut record = LockoutRecord::default();
            for i in 0..n {
                record.apply(AuthOutcome::Failure, t0 + Duration::seconds(i64::from(i)));
            }
            prop_assert_eq!(record.failed_count, n);

            record.apply(AuthOutcome::issued(t0 + Duration::days(1)), t0);
            prop_assert_eq!(record.failed_count, 0);
            prop_assert!(record.token_expires_at.is_some());
        }
    }
}
