//! Store context service

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::Store;

/// Name of the seeded sandbox store
pub const DEMO_STORE_NAME: &str = "Loja Demo";

const MAX_STORE_NAME_LEN: usize = 100;

/// Store context: the list of stores plus the one currently being managed
pub struct StoreService {
    ctx: Arc<ServiceContext>,
    current: RwLock<Option<String>>,
}

impl StoreService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            current: RwLock::new(None),
        }
    }

    /// All stores, oldest first
    pub async fn list_stores(&self) -> CoreResult<Vec<Store>> {
        self.ctx.store_repository.find_all().await
    }

    pub async fn get_store(&self, id: &str) -> CoreResult<Store> {
        self.ctx.require_store(id).await
    }

    /// Create a regular (publishable) store
    pub async fn create_store(&self, name: &str) -> CoreResult<Store> {
        let name = validate_store_name(name)?;
        let store = Store::new(name, false, self.ctx.clock.now());
        self.ctx.store_repository.save(&store).await?;
        log::info!("Store created: {} ({})", store.name, store.id);
        Ok(store)
    }

    pub async fn rename_store(&self, id: &str, name: &str) -> CoreResult<Store> {
        let name = validate_store_name(name)?;
        let mut store = self.ctx.require_store(id).await?;
        store.name = name;
        self.ctx.store_repository.save(&store).await?;
        Ok(store)
    }

    /// Delete a store and its domains. The demo store cannot be deleted.
    pub async fn delete_store(&self, id: &str) -> CoreResult<()> {
        let store = self.ctx.require_store(id).await?;
        if store.is_demo {
            return Err(CoreError::ValidationError(
                "The demo store cannot be deleted".to_string(),
            ));
        }

        self.ctx.domain_repository.delete_by_store(id).await?;
        self.ctx.store_repository.delete(id).await?;

        let mut current = self.current.write().await;
        if current.as_deref() == Some(id) {
            *current = None;
        }

        log::info!("Store deleted: {} ({id})", store.name);
        Ok(())
    }

    /// Switch the store being managed
    pub async fn select_store(&self, id: &str) -> CoreResult<Store> {
        let store = self.ctx.require_store(id).await?;
        *self.current.write().await = Some(store.id.clone());
        Ok(store)
    }

    /// The selected store, falling back to the oldest one when nothing is selected
    /// (or the selection no longer exists)
    pub async fn current_store(&self) -> CoreResult<Option<Store>> {
        let selected = self.current.read().await.clone();
        if let Some(id) = selected {
            if let Some(store) = self.ctx.store_repository.find_by_id(&id).await? {
                return Ok(Some(store));
            }
        }
        Ok(self.list_stores().await?.into_iter().next())
    }

    /// Seed the demo store if it does not exist yet; returns it either way
    pub async fn ensure_demo_store(&self) -> CoreResult<Store> {
        if let Some(demo) = self
            .ctx
            .store_repository
            .find_all()
            .await?
            .into_iter()
            .find(|s| s.is_demo)
        {
            return Ok(demo);
        }

        let demo = Store::new(DEMO_STORE_NAME.to_string(), true, self.ctx.clock.now());
        self.ctx.store_repository.save(&demo).await?;
        log::info!("Demo store seeded ({})", demo.id);
        Ok(demo)
    }
}

fn validate_store_name(name: &str) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::ValidationError(
            "Store name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_STORE_NAME_LEN {
        return Err(CoreError::ValidationError(format!(
            "Store name cannot exceed {MAX_STORE_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}
