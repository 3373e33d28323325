//! Verification workflow type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Domain, DomainHistoryEvent};

/// Outcome of one DNS/SSL check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainValidationResult {
    pub dns_verified: bool,
    pub ssl_active: bool,
    #[serde(with = "crate::utils::datetime")]
    pub last_checked: DateTime<Utc>,
}

/// State of a domain in the configuration view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    /// Never checked
    Unconfigured,
    /// A check is in flight
    Verifying,
    Verified,
    VerificationFailed,
}

impl VerificationState {
    /// State of a domain at rest (no check in flight)
    #[must_use]
    pub fn of(domain: &Domain) -> Self {
        if domain.is_fully_verified() {
            Self::Verified
        } else if domain.last_checked.is_none() {
            Self::Unconfigured
        } else {
            Self::VerificationFailed
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
            Self::VerificationFailed => "verification_failed",
        }
    }
}

/// Result of a completed verification attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub domain: Domain,
    pub state: VerificationState,
    /// History entries appended by this attempt
    pub new_events: Vec<DomainHistoryEvent>,
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient user-facing notification (toast)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}
