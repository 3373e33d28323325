use anyhow::{bail, Result};
use clap::Subcommand;
use voltz_checkout_core::types::{Domain, DomainType, Store, VerificationReport, VerificationState};
use voltz_checkout_core::utils::hostname;
use voltz_checkout_core::CoreError;

use super::Context;
use crate::output::{deleted, print_json, print_table, timestamp, yes_no};

#[derive(Subcommand, Debug)]
pub enum DomainCommands {
    /// List domains of the current store
    #[command(alias = "ls")]
    List,

    /// Add a domain (uses the `checkout` subdomain)
    Add {
        /// Hostname, e.g. minhaloja.com.br
        name: String,
    },

    /// Open a domain: show its configuration, checking it once if never verified
    Show {
        /// Domain id or hostname
        domain: String,
    },

    /// Change the subdomain prefix
    SetType {
        /// Domain id or hostname
        domain: String,
        /// checkout, secure, pay or seguro
        #[arg(value_parser = parse_domain_type)]
        domain_type: DomainType,
    },

    /// Set how many checkouts use a domain
    SetInUse {
        /// Domain id or hostname
        domain: String,
        /// Number of checkouts
        count: u32,
    },

    /// Delete a domain
    Delete {
        /// Domain id or hostname
        domain: String,
    },

    /// Check DNS and SSL now
    Verify {
        /// Domain id or hostname
        domain: String,
    },

    /// Show the audit trail of a domain
    History {
        /// Domain id or hostname
        domain: String,
    },
}

fn parse_domain_type(value: &str) -> Result<DomainType, String> {
    DomainType::parse(value).ok_or_else(|| {
        let names: Vec<&str> = DomainType::ALL.iter().map(|t| t.as_str()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

/// Find a domain of the current store by id or hostname
async fn resolve(ctx: &Context<'_>, store: &Store, key: &str) -> Result<Domain> {
    match ctx.state.domain_service.get_domain(key).await {
        Ok(domain) if domain.store_id == store.id => return Ok(domain),
        Ok(_) => bail!(
            "Domain {key} belongs to another store; select that store with --store"
        ),
        Err(CoreError::DomainNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let wanted = hostname::normalize(key);
    let domains = ctx.state.domain_service.list_domains(&store.id).await?;
    match domains
        .into_iter()
        .find(|d| d.name == wanted || d.checkout_host() == wanted)
    {
        Some(domain) => Ok(domain),
        None => bail!("Domain not found in store {}: {key}", store.name),
    }
}

pub async fn run(ctx: &Context<'_>, cmd: DomainCommands) -> Result<()> {
    let store = ctx.current_store().await?;
    let domains = &ctx.state.domain_service;
    let config = &ctx.state.domain_configuration_service;

    match cmd {
        DomainCommands::List => {
            let all = domains.list_domains(&store.id).await?;
            if ctx.json {
                return print_json(&all);
            }
            let rows: Vec<Vec<String>> = all
                .iter()
                .map(|d| {
                    vec![
                        d.id.clone(),
                        d.checkout_host(),
                        d.status.as_str().to_string(),
                        yes_no(d.dns_verified),
                        d.ssl_status.as_str().to_string(),
                        d.in_use.to_string(),
                        timestamp(d.last_checked),
                    ]
                })
                .collect();
            print_table(
                &["ID", "HOST", "STATUS", "DNS", "SSL", "IN USE", "LAST CHECKED"],
                &rows,
            );
        }
        DomainCommands::Add { name } => {
            let domain = domains.add_domain(&store.id, &name).await?;
            if ctx.json {
                return print_json(&domain);
            }
            println!("Added {} ({})", domain.name, domain.id);
            print_dns_instructions(ctx, &domain);
        }
        DomainCommands::Show { domain } => {
            let target = resolve(ctx, &store, &domain).await?;
            if !target.dns_verified {
                eprintln!("Checking {}...", target.checkout_host());
            }
            let opened = config.open(&target.id).await?;
            let state = config.state(&opened.id).await?;
            if ctx.json {
                return print_json(&opened);
            }
            print_domain(ctx, &opened, state);
        }
        DomainCommands::SetType {
            domain,
            domain_type,
        } => {
            let target = resolve(ctx, &store, &domain).await?;
            let updated = config.change_type(&target.id, domain_type).await?;
            if ctx.json {
                return print_json(&updated);
            }
            println!("{} now uses {}", updated.name, updated.checkout_host());
            print_dns_instructions(ctx, &updated);
        }
        DomainCommands::SetInUse { domain, count } => {
            let target = resolve(ctx, &store, &domain).await?;
            let updated = domains.set_in_use(&target.id, count).await?;
            if ctx.json {
                return print_json(&updated);
            }
            println!("{} is used by {} checkout(s)", updated.name, updated.in_use);
        }
        DomainCommands::Delete { domain } => {
            let target = resolve(ctx, &store, &domain).await?;
            config.delete_domain(&target.id).await?;
            if ctx.json {
                return print_json(&deleted(&target.id));
            }
            println!("Deleted {} ({})", target.name, target.id);
        }
        DomainCommands::Verify { domain } => {
            let target = resolve(ctx, &store, &domain).await?;
            eprintln!("Checking {}...", target.checkout_host());
            let report = config.verify_now(&target.id).await?;
            if ctx.json {
                return print_json(&report);
            }
            print_report(&report);
        }
        DomainCommands::History { domain } => {
            let target = resolve(ctx, &store, &domain).await?;
            if ctx.json {
                return print_json(&target.history);
            }
            let rows: Vec<Vec<String>> = target
                .history
                .iter()
                .map(|e| {
                    vec![
                        timestamp(Some(e.timestamp)),
                        e.event_type.as_str().to_string(),
                        e.details.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            print_table(&["TIME", "EVENT", "DETAILS"], &rows);
        }
    }
    Ok(())
}

fn print_domain(ctx: &Context<'_>, domain: &Domain, state: VerificationState) {
    println!("Domain:       {}", domain.name);
    println!("Host:         {}", domain.checkout_host());
    println!("Status:       {}", domain.status.as_str());
    println!("State:        {}", state.as_str());
    println!("DNS verified: {}", yes_no(domain.dns_verified));
    println!("SSL:          {}", domain.ssl_status.as_str());
    println!("In use:       {}", domain.in_use);
    println!("Last checked: {}", timestamp(domain.last_checked));
    if state != VerificationState::Verified {
        println!();
        print_dns_instructions(ctx, domain);
    }
}

fn print_dns_instructions(ctx: &Context<'_>, domain: &Domain) {
    println!("Create this DNS record at your registrar:");
    print_table(
        &["TYPE", "NAME", "VALUE"],
        &[vec![
            "CNAME".to_string(),
            domain.domain_type.as_str().to_string(),
            ctx.cname_target.to_string(),
        ]],
    );
}

fn print_report(report: &VerificationReport) {
    let domain = &report.domain;
    match report.state {
        VerificationState::Verified => println!("{} is active", domain.checkout_host()),
        _ => println!(
            "{} is not ready (dns: {}, ssl: {})",
            domain.checkout_host(),
            yes_no(domain.dns_verified),
            domain.ssl_status.as_str()
        ),
    }
    for event in &report.new_events {
        println!(
            "  + {}{}",
            event.event_type.as_str(),
            event
                .details
                .as_deref()
                .map(|d| format!(": {d}"))
                .unwrap_or_default()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use voltz_checkout_app::{AppState, AppStateBuilder};
    use voltz_checkout_core::traits::{InMemoryDomainRepository, InMemoryStoreRepository};

    use super::*;

    fn in_memory_state() -> AppState {
        AppStateBuilder::new()
            .domain_repository(Arc::new(InMemoryDomainRepository::new()))
            .store_repository(Arc::new(InMemoryStoreRepository::new()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn resolve_stays_within_current_store() {
        let state = in_memory_state();
        let a = state.store_service.create_store("A").await.unwrap();
        let b = state.store_service.create_store("B").await.unwrap();
        let own = state
            .domain_service
            .add_domain(&a.id, "loja-a.com")
            .await
            .unwrap();
        let foreign = state
            .domain_service
            .add_domain(&b.id, "loja-b.com")
            .await
            .unwrap();
        let ctx = Context {
            state: &state,
            json: false,
            cname_target: "checkout.voltz.app",
        };

        assert_eq!(resolve(&ctx, &a, &own.id).await.unwrap().id, own.id);
        assert_eq!(resolve(&ctx, &a, "checkout.loja-a.com").await.unwrap().id, own.id);
        assert!(resolve(&ctx, &a, &foreign.id).await.is_err());
        assert!(resolve(&ctx, &a, "loja-b.com").await.is_err());
    }

    #[tokio::test]
    async fn delete_with_foreign_id_leaves_domain_alone() {
        let state = in_memory_state();
        let a = state.store_service.create_store("A").await.unwrap();
        let b = state.store_service.create_store("B").await.unwrap();
        let foreign = state
            .domain_service
            .add_domain(&b.id, "loja-b.com")
            .await
            .unwrap();
        state.store_service.select_store(&a.id).await.unwrap();
        let ctx = Context {
            state: &state,
            json: false,
            cname_target: "checkout.voltz.app",
        };

        let result = run(
            &ctx,
            DomainCommands::Delete {
                domain: foreign.id.clone(),
            },
        )
        .await;

        assert!(result.is_err());
        assert!(state.domain_service.get_domain(&foreign.id).await.is_ok());
    }

    #[test]
    fn parses_domain_types() {
        assert_eq!(parse_domain_type("seguro"), Ok(DomainType::Seguro));
        let err = parse_domain_type("shop").unwrap_err();
        assert!(err.contains("checkout") && err.contains("pay"));
    }
}
