use anyhow::Result;
use clap::Subcommand;
use voltz_checkout_core::types::{ActivationProgress, ActivationStepId};

use super::Context;
use crate::output::{print_json, print_table};

#[derive(Subcommand, Debug)]
pub enum ActivationCommands {
    /// Show onboarding progress of the current store
    Show,

    /// Mark a step as completed (or not, with --incomplete)
    Set {
        /// billing, domain, gateway, shipping or shopify
        #[arg(value_parser = parse_step)]
        step: ActivationStepId,

        /// Mark the step as not completed
        #[arg(long)]
        incomplete: bool,
    },
}

fn parse_step(value: &str) -> Result<ActivationStepId, String> {
    ActivationStepId::parse(value).ok_or_else(|| {
        let names: Vec<&str> = ActivationStepId::ALL.iter().map(|s| s.as_str()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

pub async fn run(ctx: &Context<'_>, cmd: ActivationCommands) -> Result<()> {
    let store = ctx.current_store().await?;
    let activation = &ctx.state.activation_service;

    let progress = match cmd {
        ActivationCommands::Show => activation.progress(&store.id).await?,
        ActivationCommands::Set { step, incomplete } => {
            if store.is_demo {
                eprintln!("{} is a demo store; its steps cannot be changed", store.name);
            }
            activation
                .update_step_completion(&store.id, step, !incomplete)
                .await?
        }
    };

    if ctx.json {
        return print_json(&progress);
    }
    println!("Store: {}", store.name);
    print_progress(&progress);
    Ok(())
}

fn print_progress(progress: &ActivationProgress) {
    let rows: Vec<Vec<String>> = progress
        .steps
        .iter()
        .map(|s| {
            vec![
                if s.completed { "[x]" } else { "[ ]" }.to_string(),
                s.step.id.as_str().to_string(),
                if s.step.required {
                    s.step.title.to_string()
                } else {
                    format!("{} (opcional)", s.step.title)
                },
            ]
        })
        .collect();
    print_table(&["", "STEP", "TITLE"], &rows);

    println!(
        "\n{}/{} required steps ({}%)",
        progress.completed_required, progress.total_required, progress.percent_complete
    );
    println!(
        "Publishing allowed: {}",
        if progress.is_publishing_allowed { "yes" } else { "no" }
    );
}
