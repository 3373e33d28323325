//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Store not found
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Domain not found
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Validation error (form-level input errors)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A verification for this domain is already running
    #[error("Verification already in progress for domain: {0}")]
    VerificationInProgress(String),

    /// The verifier itself failed (as opposed to reporting a negative result)
    #[error("Verification error: {0}")]
    VerificationError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::StoreNotFound(_)
            | Self::DomainNotFound(_)
            | Self::ValidationError(_)
            | Self::VerificationInProgress(_) => true,
            Self::VerificationError(_) | Self::SerializationError(_) | Self::StorageError(_) => {
                false
            }
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
