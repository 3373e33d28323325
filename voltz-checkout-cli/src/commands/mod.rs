//! Subcommand implementations

pub mod activation;
pub mod domain;
pub mod store;

use anyhow::{Context as _, Result};
use voltz_checkout_app::AppState;
use voltz_checkout_core::types::Store;

/// What every subcommand runs against
pub struct Context<'a> {
    pub state: &'a AppState,
    pub json: bool,
    /// Expected CNAME target, shown in DNS instructions
    pub cname_target: &'a str,
}

impl Context<'_> {
    pub async fn current_store(&self) -> Result<Store> {
        self.state
            .store_service
            .current_store()
            .await?
            .context("No store available")
    }
}
