//! HS256 token signing and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use zeroize::Zeroizing;

use tokengate_core::{AuthError, AuthResult, TokenError};

use crate::claims::{TokenClaims, validate_claims};

/// Shortest symmetric key accepted (256 bits).
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Process-wide symmetric signing key.
///
/// Loaded once from configuration and injected into [`TokenCodec`]. It is never
/// generated on the fly: a new key would invalidate every outstanding token.
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> AuthResult<Self> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.len() < MIN_SIGNING_KEY_LEN {
            return Err(AuthError::configuration(format!(
                "signing key must be at least {MIN_SIGNING_KEY_LEN} bytes (got {})",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SigningKey").field(&"<redacted>").finish()
    }
}

/// Encodes and verifies signed tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock in `validate_claims`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    pub fn encode(&self, claims: &TokenClaims) -> AuthResult<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::configuration(format!("token signing failed: {e}")))
    }

    /// Verify the signature and decode the claims, then check expiry against `now`.
    ///
    /// A token signed with a different key is `Malformed`, never `Expired`.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
