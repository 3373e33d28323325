//! Store persistence abstraction Trait

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{ActivationStepId, Store};

/// Store Repository Trait
///
/// The persisted `Store::status` record is the single source of truth for
/// activation step completion.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// All stores, oldest first
    async fn find_all(&self) -> CoreResult<Vec<Store>>;

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Store>>;

    /// Insert or replace a store
    async fn save(&self, store: &Store) -> CoreResult<()>;

    async fn delete(&self, id: &str) -> CoreResult<()>;

    /// Set one activation step flag
    ///
    /// Returns `CoreError::StoreNotFound` if the store does not exist.
    async fn update_step(&self, id: &str, step: ActivationStepId, completed: bool)
        -> CoreResult<()>;
}

/// In-memory store repository
#[derive(Clone, Default)]
pub struct InMemoryStoreRepository {
    stores: Arc<RwLock<Vec<Store>>>,
}

impl InMemoryStoreRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_all(&self) -> CoreResult<Vec<Store>> {
        let mut stores = self.stores.read().await.clone();
        stores.sort_by_key(|s| s.created_at);
        Ok(stores)
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Store>> {
        Ok(self.stores.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn save(&self, store: &Store) -> CoreResult<()> {
        let mut stores = self.stores.write().await;
        if let Some(existing) = stores.iter_mut().find(|s| s.id == store.id) {
            *existing = store.clone();
        } else {
            stores.push(store.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        self.stores.write().await.retain(|s| s.id != id);
        Ok(())
    }

    async fn update_step(
        &self,
        id: &str,
        step: ActivationStepId,
        completed: bool,
    ) -> CoreResult<()> {
        let mut stores = self.stores.write().await;
        let store = stores
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::StoreNotFound(id.to_string()))?;
        store.status.set(step, completed);
        Ok(())
    }
}
