//! One-way password hashing (Argon2id, PHC strings).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use tokengate_core::{AuthError, AuthResult};

/// Minimum accepted plaintext length at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash and verify credentials.
///
/// `verify` must compare in constant time and must never log the plaintext.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AuthResult<String>;

    /// `Ok(false)` on mismatch; errors are reserved for unusable hashes/params.
    fn verify(&self, plaintext: &str, password_hash: &str) -> AuthResult<bool>;
}

/// Argon2id hasher with configurable cost.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Build from explicit cost parameters (memory in KiB, iterations, lanes).
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> AuthResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::configuration(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self::new(params))
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::configuration(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, password_hash: &str) -> AuthResult<bool> {
        let parsed = match PasswordHash::new(password_hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!(error = %e, "stored password hash is not a valid PHC string");
                return Ok(false);
            }
        };

        // Parameters are read from the PHC string, so hashes made with other
        // cost settings still verify.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "password verification failed");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_and_verify() {
        let hasher = cheap();
        let hash = hasher.hash("password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("password123", &hash).unwrap());
        assert!(!hasher.verify("password124", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap();
        assert_ne!(hasher.hash("adminpass").unwrap(), hasher.hash("adminpass").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!cheap().verify("anything", "not-a-phc-string").unwrap());
    }

    #[test]
    fn hashes_from_other_cost_settings_still_verify() {
        let strong = Argon2PasswordHasher::with_cost(2048, 2, 1).unwrap();
        let hash = strong.hash("password123").unwrap();
        assert!(cheap().verify("password123", &hash).unwrap());
    }

    #[test]
    fn invalid_cost_is_a_configuration_error() {
        let err = Argon2PasswordHasher::with_cost(1, 0, 0).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
