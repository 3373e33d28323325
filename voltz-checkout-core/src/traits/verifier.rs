//! Domain verification abstraction Trait

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use super::clock::{Clock, SystemClock};
use crate::error::CoreResult;
use crate::types::{Domain, DomainValidationResult};

/// Checks whether a domain's CNAME points at the platform and its certificate is issued.
///
/// A negative check is an `Ok` result with `dns_verified == false`; `Err` is reserved for
/// the verifier itself failing.
#[async_trait]
pub trait DomainVerifier: Send + Sync {
    async fn verify(&self, domain: &Domain) -> CoreResult<DomainValidationResult>;
}

/// Verifier used by demo sessions and offline development.
///
/// Waits for a fixed delay, then draws a single outcome that applies to both DNS
/// and SSL (they succeed or fail together).
pub struct SimulatedVerifier {
    delay: Duration,
    success_rate: f64,
    clock: Arc<dyn Clock>,
}

impl SimulatedVerifier {
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_SUCCESS_RATE: f64 = 0.7;

    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            success_rate: Self::DEFAULT_SUCCESS_RATE,
            clock,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Probability in `0.0..=1.0`; out-of-range values are clamped
    #[must_use]
    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        self
    }
}

impl Default for SimulatedVerifier {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl DomainVerifier for SimulatedVerifier {
    async fn verify(&self, domain: &Domain) -> CoreResult<DomainValidationResult> {
        log::debug!(
            "[verify] simulating check for {} ({:?})",
            domain.checkout_host(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;

        let success = rand::rng().random_bool(self.success_rate);

        Ok(DomainValidationResult {
            dns_verified: success,
            ssl_active: success,
            last_checked: self.clock.now(),
        })
    }
}
