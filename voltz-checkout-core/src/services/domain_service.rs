//! 域名管理服务 (domain entity store)

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{history, ServiceContext};
use crate::types::{Domain, DomainStatus, DomainUpdate, SslStatus};
use crate::utils::hostname;

/// 域名管理服务
pub struct DomainService {
    ctx: Arc<ServiceContext>,
}

impl DomainService {
    /// 创建域名服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// List the domains of a store, in insertion order
    pub async fn list_domains(&self, store_id: &str) -> CoreResult<Vec<Domain>> {
        self.ctx.domain_repository.find_by_store(store_id).await
    }

    /// Get a domain by id
    pub async fn get_domain(&self, id: &str) -> CoreResult<Domain> {
        self.ctx
            .domain_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(id.to_string()))
    }

    /// Add a domain to a store.
    ///
    /// The new domain uses the `checkout` prefix, is pending and unverified, and its
    /// history holds a single `added` entry. Names are not required to be unique.
    pub async fn add_domain(&self, store_id: &str, name: &str) -> CoreResult<Domain> {
        let name = hostname::validate(name)?;
        self.ctx.require_store(store_id).await?;

        let existing = self.ctx.domain_repository.find_by_store(store_id).await?;
        if existing.iter().any(|d| d.name == name) {
            log::warn!("Domain {name} is already registered in store {store_id}; adding anyway");
        }

        let domain = Domain::new(store_id.to_string(), name, self.ctx.clock.now());
        self.ctx.domain_repository.insert(&domain).await?;

        log::info!(
            "Domain added: {} ({}) in store {store_id}",
            domain.name,
            domain.id
        );
        Ok(domain)
    }

    /// Apply a partial update.
    ///
    /// A prefix change appends `name_changed` and keeps the verification state. A
    /// hostname change appends `name_changed` and resets verification, since the
    /// previous checks were made against another host.
    pub async fn update_domain(&self, id: &str, update: DomainUpdate) -> CoreResult<Domain> {
        let _guard = self.ctx.domain_locks.acquire(id).await;
        let mut domain = self.get_domain(id).await?;
        if update.is_empty() {
            return Ok(domain);
        }
        let now = self.ctx.clock.now();

        if let Some(ref raw_name) = update.name {
            let new_name = hostname::validate(raw_name)?;
            if let Some(event) = history::hostname_change_event(&domain.name, &new_name, now) {
                domain.history.push(event);
                domain.name = new_name;
                domain.dns_verified = false;
                domain.ssl_status = SslStatus::Pending;
                domain.status = DomainStatus::Pending;
                domain.last_checked = None;
            }
        }

        if let Some(new_type) = update.domain_type {
            if let Some(event) = history::type_change_event(domain.domain_type, new_type, now) {
                domain.history.push(event);
                domain.domain_type = new_type;
            }
        }

        if let Some(in_use) = update.in_use {
            domain.in_use = in_use;
        }

        self.ctx.domain_repository.update(&domain).await?;
        log::debug!("Domain updated: {} ({})", domain.name, domain.id);
        Ok(domain)
    }

    /// Set how many checkouts currently use this domain
    pub async fn set_in_use(&self, id: &str, count: u32) -> CoreResult<Domain> {
        self.update_domain(
            id,
            DomainUpdate {
                in_use: Some(count),
                ..DomainUpdate::default()
            },
        )
        .await
    }

    /// Remove a domain permanently
    pub async fn delete_domain(&self, id: &str) -> CoreResult<()> {
        let _guard = self.ctx.domain_locks.acquire(id).await;
        if !self.ctx.domain_repository.delete(id).await? {
            return Err(CoreError::DomainNotFound(id.to_string()));
        }
        log::info!("Domain deleted: {id}");
        Ok(())
    }
}
