//! Store (tenant) type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activation::ActivationStepId;

/// Persisted completion flags of the onboarding steps of a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreActivationStatus {
    #[serde(default)]
    pub billing: bool,
    #[serde(default)]
    pub domain: bool,
    #[serde(default)]
    pub gateway: bool,
    #[serde(default)]
    pub shipping: bool,
    #[serde(default)]
    pub shopify: bool,
}

impl StoreActivationStatus {
    #[must_use]
    pub fn get(&self, step: ActivationStepId) -> bool {
        match step {
            ActivationStepId::Billing => self.billing,
            ActivationStepId::Domain => self.domain,
            ActivationStepId::Gateway => self.gateway,
            ActivationStepId::Shipping => self.shipping,
            ActivationStepId::Shopify => self.shopify,
        }
    }

    pub fn set(&mut self, step: ActivationStepId, completed: bool) {
        let flag = match step {
            ActivationStepId::Billing => &mut self.billing,
            ActivationStepId::Domain => &mut self.domain,
            ActivationStepId::Gateway => &mut self.gateway,
            ActivationStepId::Shipping => &mut self.shipping,
            ActivationStepId::Shopify => &mut self.shopify,
        };
        *flag = completed;
    }
}

/// Store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Sandbox store shown as fully configured; never published
    #[serde(default)]
    pub is_demo: bool,
    #[serde(default)]
    pub status: StoreActivationStatus,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Store {
    #[must_use]
    pub fn new(name: String, is_demo: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            is_demo,
            status: StoreActivationStatus::default(),
            created_at: now,
        }
    }
}
