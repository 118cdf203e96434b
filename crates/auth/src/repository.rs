//! Principal store contract.

use chrono::{DateTime, Utc};

use tokengate_core::StorageError;

use crate::lockout::{AuthOutcome, LockoutRecord};
use crate::principal::{Principal, PrincipalId};

/// Storage collaborator required by the issuance core.
///
/// Implementations must:
/// - serve every lookup from an index (no scans);
/// - apply [`update_auth_outcome`](Self::update_auth_outcome) atomically, so two
///   racing failures for the same principal both count;
/// - reject [`insert`](Self::insert) with [`StorageError::Conflict`] when the
///   username or email is already taken.
pub trait PrincipalRepository: Send + Sync {
    fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StorageError>;

    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StorageError>;

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StorageError>;

    /// Atomically apply `outcome` (observed at `at`) to the principal's lockout record.
    ///
    /// Returns the updated record, or `None` if no principal has this id.
    fn update_auth_outcome(
        &self,
        id: PrincipalId,
        outcome: AuthOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<LockoutRecord>, StorageError>;

    fn insert(&self, principal: Principal) -> Result<(), StorageError>;

    /// Resolve a principal named either by id or by username.
    ///
    /// An id-shaped reference that matches no id falls back to the username
    /// index, so a principal is never unreachable because of its username.
    fn find_by_reference(&self, reference: &str) -> Result<Option<Principal>, StorageError> {
        if let Ok(id) = reference.parse::<PrincipalId>() {
            if let Some(found) = self.find_by_id(id)? {
                return Ok(Some(found));
            }
        }
        self.find_by_username(reference)
    }
}
