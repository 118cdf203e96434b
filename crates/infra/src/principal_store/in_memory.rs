use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use tokengate_auth::{AuthOutcome, LockoutRecord, Principal, PrincipalId, PrincipalRepository};
use tokengate_core::StorageError;

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<PrincipalId, Principal>,
    by_username: HashMap<String, PrincipalId>,
    by_email: HashMap<String, PrincipalId>,
}

/// In-memory principal store.
///
/// Intended for tests/dev. All three lookups go through a hash index, and the
/// lockout update runs under a single write lock so concurrent outcomes for
/// the same principal are never lost.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalRepository {
    inner: RwLock<Indexes>,
}

impl InMemoryPrincipalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Indexes>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Indexes>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }
}

impl PrincipalRepository for InMemoryPrincipalRepository {
    fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StorageError> {
        Ok(self.read()?.by_id.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StorageError> {
        let idx = self.read()?;
        Ok(idx
            .by_username
            .get(username)
            .and_then(|id| idx.by_id.get(id))
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StorageError> {
        let idx = self.read()?;
        Ok(idx
            .by_email
            .get(email)
            .and_then(|id| idx.by_id.get(id))
            .cloned())
    }

    fn update_auth_outcome(
        &self,
        id: PrincipalId,
        outcome: AuthOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<LockoutRecord>, StorageError> {
        let mut idx = self.write()?;
        Ok(idx.by_id.get_mut(&id).map(|principal| {
            principal.lockout.apply(outcome, at);
            principal.lockout.clone()
        }))
    }

    fn insert(&self, principal: Principal) -> Result<(), StorageError> {
        let mut idx = self.write()?;

        if idx.by_username.contains_key(&principal.username) {
            return Err(StorageError::Conflict(format!(
                "username '{}' is already registered",
                principal.username
            )));
        }
        if let Some(email) = &principal.email {
            if idx.by_email.contains_key(email) {
                return Err(StorageError::Conflict(format!(
                    "email '{email}' is already registered"
                )));
            }
        }
        if idx.by_id.contains_key(&principal.id) {
            return Err(StorageError::Conflict(format!(
                "principal id {} already exists",
                principal.id
            )));
        }

        idx.by_username.insert(principal.username.clone(), principal.id);
        if let Some(email) = &principal.email {
            idx.by_email.insert(email.clone(), principal.id);
        }
        tracing::debug!(principal_id = %principal.id, username = %principal.username, "principal stored");
        idx.by_id.insert(principal.id, principal);
        Ok(())
    }
}
