//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Semaphore;

use crate::error::{CoreError, CoreResult};
use crate::services::{
    ActivationService, DomainConfigurationService, DomainService, ServiceContext, StoreService,
};
use crate::traits::{
    Clock, DomainRepository, DomainVerifier, InMemoryDomainRepository, InMemoryStoreRepository,
    Notifier, StoreRepository,
};
use crate::types::{Domain, DomainValidationResult, Notification, Store};

// ===== FixedClock =====

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ===== ScriptedVerifier =====

/// One scripted verifier outcome
#[derive(Debug, Clone)]
pub enum Scripted {
    Pass,
    Fail,
    /// DNS ok, certificate not issued yet
    DnsOnly,
    Error(String),
}

/// Verifier that replays a script; `Fail` once the script runs out
pub struct ScriptedVerifier {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<usize>,
    clock: Arc<FixedClock>,
    /// When set, each call waits for a permit before answering
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedVerifier {
    pub fn new(clock: Arc<FixedClock>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
            clock,
            gate: None,
        }
    }

    pub fn gated(clock: Arc<FixedClock>, gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(clock)
        }
    }

    pub fn push(&self, outcome: Scripted) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DomainVerifier for ScriptedVerifier {
    async fn verify(&self, _domain: &Domain) -> CoreResult<DomainValidationResult> {
        *self.calls.lock().unwrap() += 1;
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| CoreError::VerificationError(e.to_string()))?
                .forget();
        }

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Fail);
        let (dns_verified, ssl_active) = match outcome {
            Scripted::Pass => (true, true),
            Scripted::Fail => (false, false),
            Scripted::DnsOnly => (true, false),
            Scripted::Error(msg) => return Err(CoreError::VerificationError(msg)),
        };

        Ok(DomainValidationResult {
            dns_verified,
            ssl_active,
            last_checked: self.clock.now(),
        })
    }
}

// ===== RecordingNotifier =====

pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

// ===== FailingDomainRepository =====

/// Domain repository whose writes fail (reads go to an inner in-memory repo)
pub struct FailingDomainRepository {
    inner: InMemoryDomainRepository,
}

impl FailingDomainRepository {
    pub fn new(inner: InMemoryDomainRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DomainRepository for FailingDomainRepository {
    async fn find_by_store(&self, store_id: &str) -> CoreResult<Vec<Domain>> {
        self.inner.find_by_store(store_id).await
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, _domain: &Domain) -> CoreResult<()> {
        Err(CoreError::StorageError("disk full".to_string()))
    }

    async fn update(&self, _domain: &Domain) -> CoreResult<()> {
        Err(CoreError::StorageError("disk full".to_string()))
    }

    async fn delete(&self, _id: &str) -> CoreResult<bool> {
        Err(CoreError::StorageError("disk full".to_string()))
    }

    async fn delete_by_store(&self, _store_id: &str) -> CoreResult<()> {
        Err(CoreError::StorageError("disk full".to_string()))
    }
}

// ===== YieldingDomainRepository =====

/// In-memory domain repository whose reads and writes suspend before touching
/// the data, like a real database adapter does
pub struct YieldingDomainRepository {
    inner: InMemoryDomainRepository,
}

impl YieldingDomainRepository {
    pub fn new(inner: InMemoryDomainRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DomainRepository for YieldingDomainRepository {
    async fn find_by_store(&self, store_id: &str) -> CoreResult<Vec<Domain>> {
        tokio::task::yield_now().await;
        self.inner.find_by_store(store_id).await
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        tokio::task::yield_now().await;
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, domain: &Domain) -> CoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert(domain).await
    }

    async fn update(&self, domain: &Domain) -> CoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.update(domain).await
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        tokio::task::yield_now().await;
        self.inner.delete(id).await
    }

    async fn delete_by_store(&self, store_id: &str) -> CoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete_by_store(store_id).await
    }
}

// ===== Factories =====

/// Everything a service test needs, with handles onto the mocks
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub domains: InMemoryDomainRepository,
    pub stores: InMemoryStoreRepository,
    pub clock: Arc<FixedClock>,
    pub verifier: Arc<ScriptedVerifier>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn domain_service(&self) -> Arc<DomainService> {
        Arc::new(DomainService::new(Arc::clone(&self.ctx)))
    }

    pub fn activation_service(&self) -> Arc<ActivationService> {
        Arc::new(ActivationService::new(Arc::clone(&self.ctx)))
    }

    pub fn store_service(&self) -> StoreService {
        StoreService::new(Arc::clone(&self.ctx))
    }

    pub fn configuration_service(&self) -> Arc<DomainConfigurationService> {
        Arc::new(DomainConfigurationService::new(
            Arc::clone(&self.ctx),
            self.domain_service(),
            self.activation_service(),
        ))
    }

    /// Persist a regular (non-demo) store
    pub async fn add_store(&self, name: &str) -> Store {
        let store = Store::new(name.to_string(), false, self.clock.now());
        self.stores.save(&store).await.unwrap();
        store
    }

    pub async fn add_demo_store(&self) -> Store {
        let store = Store::new("Loja Demo".to_string(), true, self.clock.now());
        self.stores.save(&store).await.unwrap();
        store
    }
}

pub fn create_test_harness() -> TestHarness {
    build_harness(None, false)
}

/// Harness whose verifier blocks until `gate` hands out a permit
pub fn create_gated_test_harness(gate: Arc<Semaphore>) -> TestHarness {
    build_harness(Some(gate), false)
}

/// Harness whose domain repository suspends on every call
pub fn create_yielding_test_harness() -> TestHarness {
    build_harness(None, true)
}

fn build_harness(gate: Option<Arc<Semaphore>>, yielding: bool) -> TestHarness {
    let domains = InMemoryDomainRepository::new();
    let stores = InMemoryStoreRepository::new();
    let clock = Arc::new(FixedClock::new());
    let verifier = Arc::new(match gate {
        Some(gate) => ScriptedVerifier::gated(Arc::clone(&clock), gate),
        None => ScriptedVerifier::new(Arc::clone(&clock)),
    });
    let notifier = Arc::new(RecordingNotifier::new());

    let domain_repository: Arc<dyn DomainRepository> = if yielding {
        Arc::new(YieldingDomainRepository::new(domains.clone()))
    } else {
        Arc::new(domains.clone())
    };

    let ctx = Arc::new(ServiceContext::new(
        domain_repository,
        Arc::new(stores.clone()),
        verifier.clone(),
        clock.clone(),
        notifier.clone(),
    ));

    TestHarness {
        ctx,
        domains,
        stores,
        clock,
        verifier,
        notifier,
    }
}
