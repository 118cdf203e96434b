//! Implementations of [`tokengate_auth::PrincipalRepository`].
//!
//! Only the in-memory store ships today; it backs development servers and tests.

mod in_memory;

pub use in_memory::InMemoryPrincipalRepository;
