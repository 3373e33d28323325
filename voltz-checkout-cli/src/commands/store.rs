use anyhow::{bail, Result};
use clap::Subcommand;
use voltz_checkout_app::AppState;
use voltz_checkout_core::services::compute_progress;
use voltz_checkout_core::types::Store;
use voltz_checkout_core::CoreError;

use super::Context;
use crate::output::{deleted, print_json, print_table, yes_no};

#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// List stores
    #[command(alias = "ls")]
    List,

    /// Create a store
    Create {
        /// Store name
        name: String,
    },

    /// Rename a store
    Rename {
        /// Store id or name
        store: String,
        /// New name
        name: String,
    },

    /// Delete a store and all of its domains
    Delete {
        /// Store id or name
        store: String,
    },
}

/// Find a store by id, falling back to a case-insensitive name match
pub async fn resolve(state: &AppState, key: &str) -> Result<Store> {
    match state.store_service.get_store(key).await {
        Ok(store) => return Ok(store),
        Err(CoreError::StoreNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let stores = state.store_service.list_stores().await?;
    match stores
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(key.trim()))
    {
        Some(store) => Ok(store),
        None => bail!("Store not found: {key}"),
    }
}

pub async fn run(ctx: &Context<'_>, cmd: StoreCommands) -> Result<()> {
    let stores = &ctx.state.store_service;
    match cmd {
        StoreCommands::List => {
            let all = stores.list_stores().await?;
            if ctx.json {
                return print_json(&all);
            }
            let current = stores.current_store().await?.map(|s| s.id);
            let rows: Vec<Vec<String>> = all
                .iter()
                .map(|s| {
                    let progress = compute_progress(s);
                    vec![
                        if current.as_deref() == Some(s.id.as_str()) { "*" } else { "" }
                            .to_string(),
                        s.id.clone(),
                        s.name.clone(),
                        yes_no(s.is_demo),
                        format!("{}%", progress.percent_complete),
                    ]
                })
                .collect();
            print_table(&["", "ID", "NAME", "DEMO", "PROGRESS"], &rows);
        }
        StoreCommands::Create { name } => {
            let store = stores.create_store(&name).await?;
            if ctx.json {
                return print_json(&store);
            }
            println!("Created store {} ({})", store.name, store.id);
        }
        StoreCommands::Rename { store, name } => {
            let target = resolve(ctx.state, &store).await?;
            let renamed = stores.rename_store(&target.id, &name).await?;
            if ctx.json {
                return print_json(&renamed);
            }
            println!("Renamed {} to {}", target.name, renamed.name);
        }
        StoreCommands::Delete { store } => {
            let target = resolve(ctx.state, &store).await?;
            stores.delete_store(&target.id).await?;
            if ctx.json {
                return print_json(&deleted(&target.id));
            }
            println!("Deleted store {} ({})", target.name, target.id);
        }
    }
    Ok(())
}
