//! Domain configuration workflow
//!
//! Drives verification of a domain the way the configuration screen does:
//! opening an unverified domain checks it once automatically, "verify now" checks
//! it on demand, and every completed check feeds the history and the store's
//! `domain` activation step.
//!
//! ```text
//! Unconfigured ──open/verify──▶ Verifying ──ok────▶ Verified
//!                                   │  ▲
//!                                   │  └──verify──┐
//!                                   └──fail──▶ VerificationFailed
//! ```
//!
//! Changing the subdomain prefix never triggers a check.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{history, log_failure, ActivationService, DomainService, ServiceContext};
use crate::types::{
    Domain, DomainHistoryEvent, DomainStatus, DomainType, DomainUpdate, DomainValidationResult,
    Notification, SslStatus, VerificationReport, VerificationState,
};

const TITLE_VERIFIED: &str = "Domínio verificado";
const TITLE_FAILED: &str = "Verificação falhou";
const TITLE_ERROR: &str = "Erro ao verificar domínio";

/// Domain configuration service
pub struct DomainConfigurationService {
    ctx: Arc<ServiceContext>,
    domain_service: Arc<DomainService>,
    activation_service: Arc<ActivationService>,
    /// Domain open in the configuration screen
    selected: RwLock<Option<String>>,
    /// Domains with a check in flight
    in_flight: Mutex<HashSet<String>>,
    /// Domains already auto-checked on open
    auto_checked: Mutex<HashSet<String>>,
}

/// Marks a domain as being verified until dropped
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    domain_id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.domain_id);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DomainConfigurationService {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        domain_service: Arc<DomainService>,
        activation_service: Arc<ActivationService>,
    ) -> Self {
        Self {
            ctx,
            domain_service,
            activation_service,
            selected: RwLock::new(None),
            in_flight: Mutex::new(HashSet::new()),
            auto_checked: Mutex::new(HashSet::new()),
        }
    }

    /// Open a domain in the configuration screen.
    ///
    /// An unverified domain is checked automatically the first time it is opened;
    /// later opens don't re-check. A failing automatic check is reported through the
    /// notifier and does not fail the open.
    pub async fn open(&self, domain_id: &str) -> CoreResult<Domain> {
        let domain = self.domain_service.get_domain(domain_id).await?;
        *self.selected.write().await = Some(domain.id.clone());

        let first_open = lock(&self.auto_checked).insert(domain.id.clone());
        if domain.dns_verified || !first_open {
            return Ok(domain);
        }

        log::debug!("Auto-verifying {} on first open", domain.name);
        match self.verify_now(domain_id).await {
            Ok(report) => Ok(report.domain),
            Err(e @ CoreError::DomainNotFound(_)) => Err(e),
            Err(_) => self.domain_service.get_domain(domain_id).await,
        }
    }

    /// Return to the domain list
    pub async fn close(&self) {
        *self.selected.write().await = None;
    }

    /// Id of the domain currently open, if any
    pub async fn selected(&self) -> Option<String> {
        self.selected.read().await.clone()
    }

    /// Whether a check for this domain is in flight
    #[must_use]
    pub fn is_verifying(&self, domain_id: &str) -> bool {
        lock(&self.in_flight).contains(domain_id)
    }

    /// Where the domain stands in the verification workflow
    pub async fn state(&self, domain_id: &str) -> CoreResult<VerificationState> {
        if self.is_verifying(domain_id) {
            return Ok(VerificationState::Verifying);
        }
        let domain = self.domain_service.get_domain(domain_id).await?;
        Ok(VerificationState::of(&domain))
    }

    /// Run a DNS/SSL check now.
    ///
    /// Fails with `VerificationInProgress` if a check for the same domain is already
    /// running. The domain is re-read after the check so edits made meanwhile are kept.
    pub async fn verify_now(&self, domain_id: &str) -> CoreResult<VerificationReport> {
        let _in_flight = self.begin(domain_id)?;

        let snapshot = self.domain_service.get_domain(domain_id).await?;
        log::info!("Verifying {} ({})", snapshot.checkout_host(), snapshot.id);

        let recorded = match self.ctx.verifier.verify(&snapshot).await {
            Ok(result) => self
                .record(domain_id, &result)
                .await
                .map(|(domain, new_events)| (domain, new_events, result)),
            Err(e) => Err(e),
        };
        let (domain, new_events, result) = match recorded {
            Ok(recorded) => recorded,
            Err(e) => {
                log_failure(&format!("Verification of {}", snapshot.name), &e);
                self.ctx
                    .notifier
                    .notify(Notification::error(TITLE_ERROR, e.to_string()));
                return Err(e);
            }
        };

        let state = VerificationState::of(&domain);
        if state == VerificationState::Verified {
            log::info!("Domain {} verified", domain.name);
            self.ctx.notifier.notify(Notification::success(
                TITLE_VERIFIED,
                format!("{} está ativo", domain.checkout_host()),
            ));
        } else {
            log::warn!(
                "Domain {} not verified (dns={}, ssl={})",
                domain.name,
                result.dns_verified,
                result.ssl_active
            );
            self.ctx.notifier.notify(Notification::error(
                TITLE_FAILED,
                format!(
                    "Confira o registro CNAME de {} e tente novamente",
                    domain.checkout_host()
                ),
            ));
        }

        Ok(VerificationReport {
            domain,
            state,
            new_events,
        })
    }

    /// Change the subdomain prefix. Records `name_changed`; does not re-verify.
    pub async fn change_type(
        &self,
        domain_id: &str,
        domain_type: DomainType,
    ) -> CoreResult<Domain> {
        self.domain_service
            .update_domain(domain_id, DomainUpdate::domain_type(domain_type))
            .await
    }

    /// Delete a domain, returning to the list first if it is the one open
    pub async fn delete_domain(&self, domain_id: &str) -> CoreResult<()> {
        let domain = self.domain_service.get_domain(domain_id).await?;
        {
            let mut selected = self.selected.write().await;
            if selected.as_deref() == Some(domain_id) {
                *selected = None;
            }
        }

        self.domain_service.delete_domain(domain_id).await?;
        lock(&self.auto_checked).remove(domain_id);
        self.activation_service
            .sync_domain_step(&domain.store_id)
            .await?;
        Ok(())
    }

    /// Apply a check result to the stored domain and re-sync the activation step
    async fn record(
        &self,
        domain_id: &str,
        result: &DomainValidationResult,
    ) -> CoreResult<(Domain, Vec<DomainHistoryEvent>)> {
        let (domain, new_events) = {
            let _guard = self.ctx.domain_locks.acquire(domain_id).await;
            let mut domain = self.domain_service.get_domain(domain_id).await?;
            let new_events = apply_validation(&mut domain, result);
            self.ctx.domain_repository.update(&domain).await?;
            (domain, new_events)
        };
        self.activation_service
            .sync_domain_step(&domain.store_id)
            .await?;
        Ok((domain, new_events))
    }

    fn begin(&self, domain_id: &str) -> CoreResult<InFlight<'_>> {
        if !lock(&self.in_flight).insert(domain_id.to_string()) {
            return Err(CoreError::VerificationInProgress(domain_id.to_string()));
        }
        Ok(InFlight {
            set: &self.in_flight,
            domain_id: domain_id.to_string(),
        })
    }
}

/// Apply a check result to a domain, returning the history entries it appended
fn apply_validation(
    domain: &mut Domain,
    result: &DomainValidationResult,
) -> Vec<DomainHistoryEvent> {
    let events = history::verification_events(domain, result);

    domain.dns_verified = result.dns_verified;
    domain.ssl_status = if result.ssl_active {
        SslStatus::Active
    } else {
        SslStatus::Pending
    };
    domain.last_checked = Some(result.last_checked);
    domain.status = if domain.is_fully_verified() {
        DomainStatus::Active
    } else {
        DomainStatus::Failed
    };
    domain.history.extend(events.iter().cloned());

    events
}
