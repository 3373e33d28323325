//! 类型定义模块

mod activation;
mod domain;
mod store;
mod verification;

pub use activation::{ActivationProgress, ActivationStep, ActivationStepId, ActivationStepState};
pub use domain::{
    Domain, DomainHistory, DomainHistoryEvent, DomainHistoryEventType, DomainStatus, DomainType,
    DomainUpdate, SslStatus,
};
pub use store::{Store, StoreActivationStatus};
pub use verification::{
    DomainValidationResult, Notification, NotificationLevel, VerificationReport,
    VerificationState,
};
