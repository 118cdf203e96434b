//! Error model shared by the issuance core and its boundaries.

use thiserror::Error;

/// Result type used across the issuance core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Token decode failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token's `exp` is not in the future.
    #[error("token has expired")]
    Expired,

    /// Bad signature, wrong key, wrong algorithm or unparseable claims.
    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Failures reported by the principal store.
///
/// The core never retries these; retry policy belongs to the store or the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// A uniqueness constraint was violated (username or email already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Issuance-core error.
///
/// `Authentication` deliberately carries no detail: callers must not be able to
/// tell an unknown username from a wrong password.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input, checked before any store access.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Required fields were absent or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("could not validate credentials")]
    Authentication,

    /// Valid identity, insufficient role.
    #[error("insufficient permissions: role '{required}' required")]
    Authorization { required: String },

    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid duration tag or other policy input.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(StorageError),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn authorization(required: impl Into<String>) -> Self {
        Self::Authorization {
            required: required.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::MissingFields(_) => ErrorKind::Validation,
            AuthError::Authentication => ErrorKind::Authentication,
            AuthError::Authorization { .. } => ErrorKind::Authorization,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Configuration(_) => ErrorKind::Configuration,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(msg) => AuthError::Conflict(msg),
            other => AuthError::Storage(other),
        }
    }
}

/// Transport-agnostic classification of [`AuthError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Configuration,
    Conflict,
    Storage,
}

impl ErrorKind {
    /// HTTP status the transport layer should answer with.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Configuration => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::Storage => 503,
        }
    }

    /// Stable machine-readable code for error bodies.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Authorization => "authorization_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Configuration => "configuration_error",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Storage => "storage_error",
        }
    }
}
