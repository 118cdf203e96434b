//! `tokengate-core`: shared error taxonomy and time source.
//!
//! This crate contains no IO; every other crate in the workspace builds on it.

pub mod clock;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, AuthResult, ErrorKind, StorageError, TokenError};
