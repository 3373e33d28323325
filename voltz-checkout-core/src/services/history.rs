//! Domain history recorder
//!
//! Derives which audit entries a state change produces. Only transitions are
//! recorded: a check that fails on an already unverified domain adds nothing.

use chrono::{DateTime, Utc};

use crate::types::{
    Domain, DomainHistoryEvent, DomainHistoryEventType, DomainType, DomainValidationResult,
    SslStatus,
};

/// Details attached to a DNS regression
pub const DNS_VALIDATION_FAILED: &str = "Validação de DNS falhou";

/// Entries produced by applying `result` to `old`, in the order they are appended
#[must_use]
pub fn verification_events(
    old: &Domain,
    result: &DomainValidationResult,
) -> Vec<DomainHistoryEvent> {
    let at = result.last_checked;
    let mut events = Vec::new();

    if result.dns_verified && !old.dns_verified {
        events.push(DomainHistoryEvent::new(
            DomainHistoryEventType::DnsVerified,
            at,
            None,
        ));
    }
    if result.ssl_active && old.ssl_status != SslStatus::Active {
        events.push(DomainHistoryEvent::new(
            DomainHistoryEventType::SslIssued,
            at,
            None,
        ));
    }
    if !result.dns_verified && old.dns_verified {
        events.push(DomainHistoryEvent::new(
            DomainHistoryEventType::ValidationFailed,
            at,
            Some(DNS_VALIDATION_FAILED.to_string()),
        ));
    }

    events
}

/// `name_changed` entry for a subdomain prefix edit; `None` if nothing changed
#[must_use]
pub fn type_change_event(
    old: DomainType,
    new: DomainType,
    at: DateTime<Utc>,
) -> Option<DomainHistoryEvent> {
    (old != new).then(|| {
        DomainHistoryEvent::new(
            DomainHistoryEventType::NameChanged,
            at,
            Some(format!("Subdomínio alterado de {old} para {new}")),
        )
    })
}

/// `name_changed` entry for a hostname edit; `None` if nothing changed
#[must_use]
pub fn hostname_change_event(
    old: &str,
    new: &str,
    at: DateTime<Utc>,
) -> Option<DomainHistoryEvent> {
    (old != new).then(|| {
        DomainHistoryEvent::new(
            DomainHistoryEventType::NameChanged,
            at,
            Some(format!("Domínio alterado de {old} para {new}")),
        )
    })
}
