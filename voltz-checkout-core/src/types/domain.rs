//! Custom checkout domain type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subdomain prefix used to serve the checkout (`<type>.<name>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainType {
    #[default]
    Checkout,
    Secure,
    Pay,
    Seguro,
}

impl DomainType {
    /// All selectable prefixes, in display order
    pub const ALL: [Self; 4] = [Self::Checkout, Self::Secure, Self::Pay, Self::Seguro];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Secure => "secure",
            Self::Pay => "pay",
            Self::Seguro => "seguro",
        }
    }

    /// Parse a prefix label (case-insensitive)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    #[default]
    Pending,
    Active,
    Failed,
}

impl DomainStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Failed => "failed",
        }
    }
}

/// SSL certificate status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SslStatus {
    #[default]
    Pending,
    Active,
}

impl SslStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }
}

/// Kind of a domain history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainHistoryEventType {
    Added,
    DnsVerified,
    SslIssued,
    ValidationFailed,
    NameChanged,
}

impl DomainHistoryEventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::DnsVerified => "dns_verified",
            Self::SslIssued => "ssl_issued",
            Self::ValidationFailed => "validation_failed",
            Self::NameChanged => "name_changed",
        }
    }
}

/// One entry of a domain's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainHistoryEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: DomainHistoryEventType,
    #[serde(with = "crate::utils::datetime")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DomainHistoryEvent {
    #[must_use]
    pub fn new(
        event_type: DomainHistoryEventType,
        timestamp: DateTime<Utc>,
        details: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            timestamp,
            details,
        }
    }
}

/// Append-only audit trail of a domain.
///
/// Entries can be pushed and read; there is no way to edit or remove one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainHistory(Vec<DomainHistoryEvent>);

impl DomainHistory {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, event: DomainHistoryEvent) {
        self.0.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = DomainHistoryEvent>) {
        self.0.extend(events);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DomainHistoryEvent> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&DomainHistoryEvent> {
        self.0.last()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DomainHistoryEvent] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DomainHistory {
    type Item = &'a DomainHistoryEvent;
    type IntoIter = std::slice::Iter<'a, DomainHistoryEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Custom checkout domain of a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    /// Owning store
    pub store_id: String,
    /// Hostname, e.g. `minhaloja.com`
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: DomainType,
    pub status: DomainStatus,
    pub dns_verified: bool,
    pub ssl_status: SslStatus,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub last_checked: Option<DateTime<Utc>>,
    /// Number of checkouts currently served from this domain
    #[serde(default)]
    pub in_use: u32,
    #[serde(default)]
    pub history: DomainHistory,
}

impl Domain {
    /// A freshly added domain: pending, unverified, history = [added]
    #[must_use]
    pub fn new(store_id: String, name: String, now: DateTime<Utc>) -> Self {
        let mut history = DomainHistory::new();
        history.push(DomainHistoryEvent::new(
            DomainHistoryEventType::Added,
            now,
            None,
        ));
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            store_id,
            name,
            domain_type: DomainType::default(),
            status: DomainStatus::Pending,
            dns_verified: false,
            ssl_status: SslStatus::Pending,
            last_checked: None,
            in_use: 0,
            history,
        }
    }

    /// Fully qualified checkout host, e.g. `checkout.minhaloja.com`
    #[must_use]
    pub fn checkout_host(&self) -> String {
        format!("{}.{}", self.domain_type, self.name)
    }

    /// DNS verified and certificate issued
    #[must_use]
    pub fn is_fully_verified(&self) -> bool {
        self.dns_verified && self.ssl_status == SslStatus::Active
    }
}

/// Partial update of a domain (unset fields are left unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<DomainType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_use: Option<u32>,
}

impl DomainUpdate {
    #[must_use]
    pub fn domain_type(domain_type: DomainType) -> Self {
        Self {
            domain_type: Some(domain_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.domain_type.is_none() && self.in_use.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_domain_defaults() {
        let d = Domain::new("store-1".to_string(), "loja.com".to_string(), Utc::now());
        assert_eq!(d.domain_type, DomainType::Checkout);
        assert_eq!(d.status, DomainStatus::Pending);
        assert!(!d.dns_verified);
        assert_eq!(d.ssl_status, SslStatus::Pending);
        assert!(d.last_checked.is_none());
        assert_eq!(d.history.len(), 1);
        assert_eq!(
            d.history.last().map(|e| e.event_type),
            Some(DomainHistoryEventType::Added)
        );
    }

    #[test]
    fn history_appends_keep_earlier_entries() {
        let mut d = Domain::new("s".to_string(), "loja.com".to_string(), Utc::now());
        let added = d.history.as_slice().to_vec();

        d.history.extend([
            DomainHistoryEvent::new(DomainHistoryEventType::DnsVerified, Utc::now(), None),
            DomainHistoryEvent::new(DomainHistoryEventType::SslIssued, Utc::now(), None),
        ]);

        assert_eq!(d.history.len(), 3);
        assert_eq!(&d.history.as_slice()[..1], &added[..]);
        let types: Vec<_> = d.history.iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                DomainHistoryEventType::Added,
                DomainHistoryEventType::DnsVerified,
                DomainHistoryEventType::SslIssued
            ]
        );
    }

    #[test]
    fn checkout_host_uses_type_prefix() {
        let mut d = Domain::new("s".to_string(), "loja.com".to_string(), Utc::now());
        assert_eq!(d.checkout_host(), "checkout.loja.com");
        d.domain_type = DomainType::Seguro;
        assert_eq!(d.checkout_host(), "seguro.loja.com");
    }

    #[test]
    fn domain_type_parse_is_case_insensitive() {
        assert_eq!(DomainType::parse("SECURE"), Some(DomainType::Secure));
        assert_eq!(DomainType::parse(" pay "), Some(DomainType::Pay));
        assert_eq!(DomainType::parse("shop"), None);
    }

    #[test]
    fn serializes_with_wire_names() {
        let d = Domain::new("s".to_string(), "loja.com".to_string(), Utc::now());
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "checkout");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["dnsVerified"], false);
        assert_eq!(json["sslStatus"], "pending");
        assert!(json["lastChecked"].is_null());
        assert_eq!(json["history"][0]["type"], "added");
        assert!(json["history"][0].get("details").is_none());
    }

    #[test]
    fn deserializes_unix_millis_last_checked() {
        let json = serde_json::json!({
            "id": "d1",
            "storeId": "s1",
            "name": "loja.com",
            "type": "pay",
            "status": "active",
            "dnsVerified": true,
            "sslStatus": "active",
            "lastChecked": 1_700_000_000_000_i64,
            "inUse": 3,
            "history": []
        });
        let d: Domain = serde_json::from_value(json).unwrap();
        assert_eq!(d.domain_type, DomainType::Pay);
        assert!(d.is_fully_verified());
        assert_eq!(d.last_checked.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(d.in_use, 3);
    }
}
