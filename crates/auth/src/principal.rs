use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lockout::LockoutRecord;
use crate::roles::RoleSet;

/// Identity of a registered principal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A registered identity: credentials, roles and lockout state.
///
/// # Invariants
/// - `username` is unique across the store.
/// - `roles` is never empty (enforced by [`RoleSet`]).
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    pub email: Option<String>,
    /// PHC-formatted password hash.
    pub password_hash: String,
    pub roles: RoleSet,
    pub lockout: LockoutRecord,
}

impl Principal {
    pub fn new(
        username: impl Into<String>,
        email: Option<String>,
        password_hash: impl Into<String>,
        roles: RoleSet,
    ) -> Self {
        Self {
            id: PrincipalId::new(),
            username: username.into(),
            email,
            password_hash: password_hash.into(),
            roles,
            lockout: LockoutRecord::default(),
        }
    }

    pub fn view(&self) -> PrincipalView {
        PrincipalView::from(self)
    }
}

// Keeps the password hash out of logs and panic messages.
impl core::fmt::Debug for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .field("lockout", &self.lockout)
            .finish()
    }
}

/// Public projection of a [`Principal`] (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: PrincipalId,
    pub username: String,
    pub email: Option<String>,
    pub roles: RoleSet,
    pub failed_count: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub token_created_at: Option<DateTime<Utc>>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl From<&Principal> for PrincipalView {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            username: p.username.clone(),
            email: p.email.clone(),
            roles: p.roles.clone(),
            failed_count: p.lockout.failed_count,
            last_failure_at: p.lockout.last_failure_at,
            last_success_at: p.lockout.last_success_at,
            token_created_at: p.lockout.token_created_at,
            token_expires_at: p.lockout.token_expires_at,
        }
    }
}
