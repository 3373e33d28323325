//! Onboarding activation step type definitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Onboarding step identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStepId {
    Billing,
    Domain,
    Gateway,
    Shipping,
    Shopify,
}

impl ActivationStepId {
    pub const ALL: [Self; 5] = [
        Self::Billing,
        Self::Domain,
        Self::Gateway,
        Self::Shipping,
        Self::Shopify,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::Domain => "domain",
            Self::Gateway => "gateway",
            Self::Shipping => "shipping",
            Self::Shopify => "shopify",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Only the Shopify integration is optional
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, Self::Shopify)
    }
}

impl fmt::Display for ActivationStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of an onboarding step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationStep {
    pub id: ActivationStepId,
    pub title: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Completion state of one step for a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationStepState {
    pub step: ActivationStep,
    pub completed: bool,
}

/// Derived onboarding progress of a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationProgress {
    pub store_id: String,
    pub steps: Vec<ActivationStepState>,
    pub completed_required: usize,
    pub total_required: usize,
    /// All required steps completed
    pub is_all_completed: bool,
    /// 0..=100, over required steps
    pub percent_complete: u8,
    pub is_publishing_allowed: bool,
}
