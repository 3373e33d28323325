//! Domain persistence abstraction Trait

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::Domain;

/// Domain Repository Trait
///
/// Platform implementations:
/// - `InMemoryDomainRepository` (tests, demo sessions)
/// - `SqliteStore` in `voltz-checkout-app`
#[async_trait]
pub trait DomainRepository: Send + Sync {
    /// All domains of a store, in insertion order
    async fn find_by_store(&self, store_id: &str) -> CoreResult<Vec<Domain>>;

    /// Get a single domain
    ///
    /// # Returns
    /// * `Some(domain)` - found
    /// * `None` - no domain with this id
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>>;

    /// Append a new domain
    async fn insert(&self, domain: &Domain) -> CoreResult<()>;

    /// Replace an existing domain (matched by id)
    ///
    /// Returns `CoreError::DomainNotFound` if the domain does not exist.
    async fn update(&self, domain: &Domain) -> CoreResult<()>;

    /// Remove a domain
    ///
    /// # Returns
    /// * `true` - a domain was removed
    /// * `false` - nothing matched
    async fn delete(&self, id: &str) -> CoreResult<bool>;

    /// Remove all domains of a store (called when the store is deleted)
    async fn delete_by_store(&self, store_id: &str) -> CoreResult<()>;
}

/// In-memory domain repository
///
/// Default implementation, keeps insertion order.
#[derive(Clone, Default)]
pub struct InMemoryDomainRepository {
    domains: Arc<RwLock<Vec<Domain>>>,
}

impl InMemoryDomainRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepository {
    async fn find_by_store(&self, store_id: &str) -> CoreResult<Vec<Domain>> {
        Ok(self
            .domains
            .read()
            .await
            .iter()
            .filter(|d| d.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        Ok(self.domains.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, domain: &Domain) -> CoreResult<()> {
        self.domains.write().await.push(domain.clone());
        Ok(())
    }

    async fn update(&self, domain: &Domain) -> CoreResult<()> {
        let mut domains = self.domains.write().await;
        let slot = domains
            .iter_mut()
            .find(|d| d.id == domain.id)
            .ok_or_else(|| CoreError::DomainNotFound(domain.id.clone()))?;
        *slot = domain.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        let mut domains = self.domains.write().await;
        let before = domains.len();
        domains.retain(|d| d.id != id);
        Ok(domains.len() != before)
    }

    async fn delete_by_store(&self, store_id: &str) -> CoreResult<()> {
        self.domains.write().await.retain(|d| d.store_id != store_id);
        Ok(())
    }
}
