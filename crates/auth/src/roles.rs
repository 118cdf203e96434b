use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use tokengate_core::AuthError;

/// Role tag used for RBAC.
///
/// Roles form a closed set: an unknown tag is rejected at parse time instead of
/// silently becoming a new role. Roles are additive, there is no hierarchy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::validation(format!("unknown role '{other}'"))),
        }
    }
}

/// Non-empty set of roles held by a principal or embedded in a token.
///
/// Serializes as a JSON list of role tags, e.g. `["admin", "user"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Build a role set; an empty input is rejected.
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Result<Self, AuthError> {
        let set: BTreeSet<Role> = roles.into_iter().collect();
        if set.is_empty() {
            return Err(AuthError::validation("role set must not be empty"));
        }
        Ok(Self(set))
    }

    pub fn user() -> Self {
        Self(BTreeSet::from([Role::User]))
    }

    pub fn admin() -> Self {
        Self(BTreeSet::from([Role::User, Role::Admin]))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// Parse a list of role tags; an unknown tag or an empty list is rejected.
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Result<Self, AuthError> {
        let roles = tags
            .iter()
            .map(|t| t.as_ref().parse::<Role>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(roles)
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::user()
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = AuthError;

    fn try_from(value: Vec<Role>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(value: RoleSet) -> Self {
        value.0.into_iter().collect()
    }
}
