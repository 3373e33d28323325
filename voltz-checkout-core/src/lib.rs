//! voltz.checkout Core Library
//!
//! Platform-independent business logic for the store console:
//! - Store context (Store Service)
//! - Custom checkout domains (Domain Service)
//! - DNS/SSL verification workflow (Domain Configuration Service)
//! - Onboarding activation steps (Activation Service)
//!
//! Storage, time, verification and user notifications are abstracted behind traits,
//! so the same services run against in-memory repositories in tests and against
//! `SQLite` (or any other adapter) in the application.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{Clock, DomainRepository, DomainVerifier, Notifier, StoreRepository};
