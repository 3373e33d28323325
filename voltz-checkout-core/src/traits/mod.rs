//! Storage layer and collaborator abstraction trait definitions

mod clock;
mod domain_repository;
mod notifier;
mod store_repository;
mod verifier;

pub use clock::{Clock, SystemClock};
pub use domain_repository::{DomainRepository, InMemoryDomainRepository};
pub use notifier::{LogNotifier, Notifier};
pub use store_repository::{InMemoryStoreRepository, StoreRepository};
pub use verifier::{DomainVerifier, SimulatedVerifier};
