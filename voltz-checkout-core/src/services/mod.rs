//! 业务逻辑服务层

mod activation_service;
mod domain_configuration_service;
mod domain_service;
pub mod history;
mod store_service;

pub use activation_service::{compute_progress, ActivationService, ACTIVATION_STEPS};
pub use domain_configuration_service::DomainConfigurationService;
pub use domain_service::DomainService;
pub use store_service::{StoreService, DEMO_STORE_NAME};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::error::{CoreError, CoreResult};
use crate::traits::{Clock, DomainRepository, DomainVerifier, Notifier, StoreRepository};
use crate::types::Store;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Domain persistence
    pub domain_repository: Arc<dyn DomainRepository>,
    /// Store persistence (also the source of truth for activation steps)
    pub store_repository: Arc<dyn StoreRepository>,
    /// DNS/SSL verifier
    pub verifier: Arc<dyn DomainVerifier>,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// User notification sink
    pub notifier: Arc<dyn Notifier>,
    /// Per-domain write locks
    pub(crate) domain_locks: DomainLocks,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn DomainRepository>,
        store_repository: Arc<dyn StoreRepository>,
        verifier: Arc<dyn DomainVerifier>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            domain_repository,
            store_repository,
            verifier,
            clock,
            notifier,
            domain_locks: DomainLocks::default(),
        }
    }

    /// Load a store or fail with `StoreNotFound`
    pub async fn require_store(&self, store_id: &str) -> CoreResult<Store> {
        self.store_repository
            .find_by_id(store_id)
            .await?
            .ok_or_else(|| CoreError::StoreNotFound(store_id.to_string()))
    }
}

/// 域名写锁
///
/// Every read-modify-write of a domain record holds the lock for its id across
/// the read and the `update`, so a check result and an edit cannot overwrite
/// each other.
#[derive(Default)]
pub(crate) struct DomainLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl DomainLocks {
    /// Wait for exclusive access to one domain
    pub(crate) async fn acquire(&self, domain_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // 清理无人持有的锁
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            Arc::clone(locks.entry(domain_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Log a failed operation at the level its error classification calls for
pub(crate) fn log_failure(operation: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{operation} failed: {err}");
    } else {
        log::error!("{operation} failed: {err}");
    }
}
