//! Platform-agnostic application bootstrap for the Voltz checkout console.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter injection).

pub mod adapters;

use std::sync::Arc;

use voltz_checkout_core::error::{CoreError, CoreResult};
use voltz_checkout_core::services::{
    ActivationService, DomainConfigurationService, DomainService, ServiceContext, StoreService,
};
use voltz_checkout_core::traits::{
    Clock, DomainRepository, DomainVerifier, LogNotifier, Notifier, SimulatedVerifier,
    StoreRepository, SystemClock,
};
use voltz_checkout_core::types::Store;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Store context service
    pub store_service: Arc<StoreService>,
    /// Domain entity service
    pub domain_service: Arc<DomainService>,
    /// Activation steps service
    pub activation_service: Arc<ActivationService>,
    /// Domain configuration workflow
    pub domain_configuration_service: Arc<DomainConfigurationService>,
}

impl AppState {
    /// Run the startup sequence: seed the demo store, then select the first store.
    ///
    /// Returns the selected store.
    pub async fn run_startup(&self) -> CoreResult<Store> {
        let demo = self.store_service.ensure_demo_store().await?;

        let first = self
            .store_service
            .list_stores()
            .await?
            .into_iter()
            .next()
            .unwrap_or(demo);
        let selected = self.store_service.select_store(&first.id).await?;

        log::info!("Startup complete, current store: {} ({})", selected.name, selected.id);
        Ok(selected)
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_repository` — how domains are stored
/// - `store_repository` — how stores (and their activation steps) are stored
///
/// # Optional
/// - `verifier` — defaults to `SimulatedVerifier`
/// - `clock` — defaults to `SystemClock`
/// - `notifier` — defaults to `LogNotifier`
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn DomainRepository>>,
    store_repository: Option<Arc<dyn StoreRepository>>,
    verifier: Option<Arc<dyn DomainVerifier>>,
    clock: Option<Arc<dyn Clock>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain_repository: None,
            store_repository: None,
            verifier: None,
            clock: None,
            notifier: None,
        }
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn store_repository(mut self, repo: Arc<dyn StoreRepository>) -> Self {
        self.store_repository = Some(repo);
        self
    }

    /// Use one `SqliteStore` for both repositories
    #[cfg(feature = "sqlite-store")]
    #[must_use]
    pub fn sqlite_store(self, store: Arc<adapters::SqliteStore>) -> Self {
        self.domain_repository(Arc::clone(&store) as Arc<dyn DomainRepository>)
            .store_repository(store)
    }

    #[must_use]
    pub fn verifier(mut self, verifier: Arc<dyn DomainVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let domain_repository = self.domain_repository.ok_or_else(|| {
            CoreError::ValidationError("domain_repository is required".to_string())
        })?;
        let store_repository = self.store_repository.ok_or_else(|| {
            CoreError::ValidationError("store_repository is required".to_string())
        })?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let verifier = self
            .verifier
            .unwrap_or_else(|| Arc::new(SimulatedVerifier::new(Arc::clone(&clock))));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(LogNotifier));

        let ctx = Arc::new(ServiceContext::new(
            domain_repository,
            store_repository,
            verifier,
            clock,
            notifier,
        ));

        let store_service = Arc::new(StoreService::new(Arc::clone(&ctx)));
        let domain_service = Arc::new(DomainService::new(Arc::clone(&ctx)));
        let activation_service = Arc::new(ActivationService::new(Arc::clone(&ctx)));
        let domain_configuration_service = Arc::new(DomainConfigurationService::new(
            Arc::clone(&ctx),
            Arc::clone(&domain_service),
            Arc::clone(&activation_service),
        ));

        Ok(AppState {
            ctx,
            store_service,
            domain_service,
            activation_service,
            domain_configuration_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
