//! Inbound request shapes and their structural validation.
//!
//! Every field is optional at the type level so that a request missing several
//! fields is rejected with one error naming all of them.

use serde::Deserialize;

use tokengate_core::{AuthError, AuthResult};

use crate::duration::DurationTag;
use crate::password::MIN_PASSWORD_LEN;
use crate::principal::PrincipalId;
use crate::roles::RoleSet;

/// Collects missing fields while extracting present, non-blank values.
#[derive(Default)]
struct Required {
    missing: Vec<String>,
}

impl Required {
    fn take<'a>(&mut self, name: &str, value: &'a Option<String>) -> &'a str {
        match value.as_deref() {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                self.missing.push(name.to_string());
                ""
            }
        }
    }

    fn finish(self) -> AuthResult<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::MissingFields(self.missing))
        }
    }
}

/// Password login: `POST /auth/token`.
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub duration: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ValidLogin<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub duration: DurationTag,
}

impl LoginRequest {
    pub fn validate(&self) -> AuthResult<ValidLogin<'_>> {
        let mut required = Required::default();
        let username = required.take("username", &self.username);
        let password = required.take("password", &self.password);
        let duration = required.take("duration", &self.duration);
        required.finish()?;

        Ok(ValidLogin {
            username,
            password,
            duration: duration.parse()?,
        })
    }
}

/// Admin-on-behalf-of-target issuance: `POST /auth/token/delegate`.
///
/// `username`/`password`/`email` describe the requesting admin; `target` names
/// the principal the token is minted for (username or principal id).
#[derive(Clone, Default, Deserialize)]
pub struct DelegatedIssuanceRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub target: Option<String>,
    pub duration: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ValidDelegation<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub target: &'a str,
    pub duration: DurationTag,
}

impl DelegatedIssuanceRequest {
    /// Presence check, then duration-tag check. Touches no store.
    pub fn validate(&self) -> AuthResult<ValidDelegation<'_>> {
        let mut required = Required::default();
        let username = required.take("username", &self.username);
        let password = required.take("password", &self.password);
        let email = required.take("email", &self.email);
        let target = required.take("target", &self.target);
        let duration = required.take("duration", &self.duration);
        required.finish()?;

        Ok(ValidDelegation {
            username,
            password,
            email,
            target,
            duration: duration.parse()?,
        })
    }
}

/// Admin-only principal registration: `POST /users/register`.
#[derive(Clone, Default, Deserialize)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Defaults to `["user"]` when absent.
    pub roles: Option<Vec<String>>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ValidRegistration<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password: &'a str,
    pub roles: RoleSet,
}

impl Registration {
    pub fn validate(&self) -> AuthResult<ValidRegistration<'_>> {
        let mut required = Required::default();
        let username = required.take("username", &self.username);
        let password = required.take("password", &self.password);
        required.finish()?;

        if username.trim() != username {
            return Err(AuthError::validation("username must not have surrounding whitespace"));
        }
        // Token subjects are either a username or a principal id; the two
        // namespaces must not overlap.
        if username.parse::<PrincipalId>().is_ok() {
            return Err(AuthError::validation("username must not be a principal id"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(e) if e.contains('@') => Some(e),
            Some(_) => return Err(AuthError::validation("invalid email format")),
        };

        let roles = match &self.roles {
            None => RoleSet::default(),
            Some(tags) => RoleSet::parse(tags)?,
        };

        Ok(ValidRegistration {
            username,
            email,
            password,
            roles,
        })
    }
}

// These types carry plaintext passwords; keep them out of Debug output.
macro_rules! debug_without_password {
    ($t:ident, [$($field:ident),*]) => {
        impl core::fmt::Debug for $t<'_> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($t))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
    ($t:ident, owned, [$($field:ident),*]) => {
        impl core::fmt::Debug for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_struct(stringify!($t))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

debug_without_password!(LoginRequest, owned, [username, duration]);
debug_without_password!(DelegatedIssuanceRequest, owned, [username, email, target, duration]);
debug_without_password!(Registration, owned, [username, email, roles]);
debug_without_password!(ValidLogin, [username, duration]);
debug_without_password!(ValidDelegation, [username, email, target, duration]);
debug_without_password!(ValidRegistration, [username, email, roles]);
