//! voltz - Voltz checkout console
//!
//! Manage stores, custom checkout domains and onboarding steps from the terminal.

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use voltz_checkout_app::adapters::SqliteStore;
use voltz_checkout_app::{AppState, AppStateBuilder};
use voltz_checkout_core::traits::{Clock, DomainVerifier, SimulatedVerifier, SystemClock};
use voltz_checkout_probe::{ProbeConfig, ProbeVerifier, DEFAULT_CNAME_TARGET};

mod commands;
mod output;

use commands::{activation::ActivationCommands, domain::DomainCommands, store::StoreCommands};

/// voltz - Voltz checkout console
#[derive(Parser, Debug)]
#[command(name = "voltz")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "VOLTZ_DB_PATH")]
    db: Option<PathBuf>,

    /// Store to operate on (id or name); defaults to the first store
    #[arg(short, long, global = true)]
    store: Option<String>,

    /// How domains are verified
    #[arg(long, value_enum, default_value_t = VerifierKind::Simulated, global = true)]
    verifier: VerifierKind,

    /// Hostname customer CNAME records must point at (probe verifier)
    #[arg(long, env = "VOLTZ_CNAME_TARGET", default_value = DEFAULT_CNAME_TARGET)]
    cname_target: String,

    /// DNS server for the probe verifier (system resolver if omitted)
    #[arg(long)]
    nameserver: Option<IpAddr>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store management
    #[command(subcommand)]
    Store(StoreCommands),

    /// Custom checkout domains of the current store
    #[command(subcommand)]
    Domain(DomainCommands),

    /// Onboarding steps of the current store
    #[command(subcommand)]
    Activation(ActivationCommands),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VerifierKind {
    /// Random outcome after a short delay
    Simulated,
    /// Real CNAME lookup and TLS certificate check
    Probe,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let state = build_state(&cli).await?;
    state
        .run_startup()
        .await
        .context("Failed to initialize stores")?;

    if let Some(ref key) = cli.store {
        let store = commands::store::resolve(&state, key).await?;
        state.store_service.select_store(&store.id).await?;
    }

    let ctx = commands::Context {
        state: &state,
        json: cli.json,
        cname_target: &cli.cname_target,
    };
    match cli.command {
        Commands::Store(cmd) => commands::store::run(&ctx, cmd).await,
        Commands::Domain(cmd) => commands::domain::run(&ctx, cmd).await,
        Commands::Activation(cmd) => commands::activation::run(&ctx, cmd).await,
    }
}

async fn build_state(cli: &Cli) -> Result<AppState> {
    let db_path = match cli.db {
        Some(ref path) => path.clone(),
        None => default_db_path()?,
    };
    tracing::debug!("Using database {}", db_path.display());

    let store = SqliteStore::new(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let verifier: Arc<dyn DomainVerifier> = match cli.verifier {
        VerifierKind::Simulated => Arc::new(SimulatedVerifier::new(Arc::clone(&clock))),
        VerifierKind::Probe => {
            let config = ProbeConfig::default()
                .with_cname_target(cli.cname_target.clone())
                .with_nameserver(cli.nameserver);
            Arc::new(ProbeVerifier::new(config, Arc::clone(&clock)))
        }
    };

    let state = AppStateBuilder::new()
        .sqlite_store(Arc::new(store))
        .verifier(verifier)
        .clock(clock)
        .build()?;
    Ok(state)
}

fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine the user data directory")?;
    Ok(base.join("voltz-checkout").join("voltz.db"))
}
