//! Infrastructure layer: concrete principal stores.

pub mod principal_store;

pub use principal_store::InMemoryPrincipalRepository;
