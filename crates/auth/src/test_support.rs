//! In-crate fixtures: a call-recording store and a seeded service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use tokengate_core::{ManualClock, StorageError};

use crate::codec::{SigningKey, TokenCodec};
use crate::delegation::DelegatedIssuanceFlow;
use crate::issuer::TokenIssuer;
use crate::lockout::{AuthOutcome, LockoutRecord, LockoutTracker};
use crate::password::{Argon2PasswordHasher, PasswordHasher};
use crate::principal::{Principal, PrincipalId};
use crate::repository::PrincipalRepository;
use crate::roles::RoleSet;
use crate::service::TokenService;
use crate::verifier::CredentialVerifier;

pub const TEST_KEY: &[u8] = b"tokengate-test-signing-key-0123456789";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    FindById(PrincipalId),
    FindByUsername(String),
    FindByEmail(String),
    UpdateAuthOutcome(PrincipalId, AuthOutcome),
    Insert(String),
}

#[derive(Default)]
struct State {
    principals: HashMap<PrincipalId, Principal>,
    calls: Vec<RepoCall>,
    fail_next: Option<String>,
}

/// Store double that logs every call in order.
#[derive(Default)]
pub struct RecordingRepository {
    state: Mutex<State>,
}

impl RecordingRepository {
    pub fn calls(&self) -> Vec<RepoCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Make the next call fail with `StorageError::Unavailable`.
    pub fn fail_next(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    pub fn outcome_updates_for(&self, id: PrincipalId) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RepoCall::UpdateAuthOutcome(pid, _) if *pid == id))
            .count()
    }

    pub fn outcome_update_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RepoCall::UpdateAuthOutcome(..)))
            .count()
    }

    /// Read a principal without recording a call.
    pub fn peek(&self, username: &str) -> Option<Principal> {
        self.lock()
            .principals
            .values()
            .find(|p| p.username == username)
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn enter(&self, call: RepoCall) -> Result<std::sync::MutexGuard<'_, State>, StorageError> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(message) => Err(StorageError::Unavailable(message)),
            None => Ok(state),
        }
    }
}

impl PrincipalRepository for RecordingRepository {
    fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, StorageError> {
        let state = self.enter(RepoCall::FindById(id))?;
        Ok(state.principals.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StorageError> {
        let state = self.enter(RepoCall::FindByUsername(username.to_string()))?;
        Ok(state
            .principals
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StorageError> {
        let state = self.enter(RepoCall::FindByEmail(email.to_string()))?;
        Ok(state
            .principals
            .values()
            .find(|p| p.email.as_deref() == Some(email))
            .cloned())
    }

    fn update_auth_outcome(
        &self,
        id: PrincipalId,
        outcome: AuthOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<LockoutRecord>, StorageError> {
        let mut state = self.enter(RepoCall::UpdateAuthOutcome(id, outcome))?;
        Ok(state.principals.get_mut(&id).map(|p| {
            p.lockout.apply(outcome, at);
            p.lockout.clone()
        }))
    }

    fn insert(&self, principal: Principal) -> Result<(), StorageError> {
        let mut state = self.enter(RepoCall::Insert(principal.username.clone()))?;
        let taken = state.principals.values().any(|p| {
            p.username == principal.username
                || (p.email.is_some() && p.email == principal.email)
        });
        if taken {
            return Err(StorageError::Conflict(format!(
                "principal '{}' already exists",
                principal.username
            )));
        }
        state.principals.insert(principal.id, principal);
        Ok(())
    }
}

/// Seeded principals:
/// - `alice` / `password123` / `alice@example.com`, roles `{user}`
/// - `bob` / `bobsecret` / `bob@x.com`, roles `{user}`
/// - `admin` / `adminpass` / `admin@example.com`, roles `{user, admin}`
pub struct Fixture {
    pub repo: Arc<RecordingRepository>,
    pub clock: Arc<ManualClock>,
    pub codec: Arc<TokenCodec>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub service: TokenService,
}

impl Fixture {
    pub fn new() -> Self {
        let repo = Arc::new(RecordingRepository::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let key = SigningKey::from_bytes(TEST_KEY.to_vec()).unwrap();
        let codec = Arc::new(TokenCodec::new(&key));
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1, 1).unwrap());

        for (username, password, email, roles) in [
            ("alice", "password123", "alice@example.com", RoleSet::user()),
            ("bob", "bobsecret", "bob@x.com", RoleSet::user()),
            ("admin", "adminpass", "admin@example.com", RoleSet::admin()),
        ] {
            let hash = hasher.hash(password).unwrap();
            repo.insert(Principal::new(username, Some(email.to_string()), hash, roles))
                .unwrap();
        }
        repo.clear_calls();

        let service = TokenService::new(repo.clone(), hasher.clone(), &key, clock.clone());

        Self {
            repo,
            clock,
            codec,
            hasher,
            service,
        }
    }

    pub fn principal(&self, username: &str) -> Principal {
        self.repo.peek(username).unwrap()
    }

    pub fn lockout(&self) -> LockoutTracker {
        LockoutTracker::new(self.repo.clone(), self.clock.clone())
    }

    pub fn verifier(&self) -> CredentialVerifier {
        CredentialVerifier::new(self.repo.clone(), self.hasher.clone(), self.lockout())
    }

    pub fn delegation(&self) -> DelegatedIssuanceFlow {
        DelegatedIssuanceFlow::new(
            self.repo.clone(),
            self.verifier(),
            TokenIssuer::new(self.codec.clone(), self.clock.clone()),
            self.lockout(),
        )
    }
}
