// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw - Guided workouts in the terminal

mod commands;
mod completions;
mod console;
mod error;
mod logging;
mod output;
mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{advise, history, plan, resume, run};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::completions::CompletionsArgs;
use crate::error::GwError;
use crate::state::StateDir;

#[derive(Parser)]
#[command(name = "gw", version, about = "Guided workouts - sets, rests and progression")]
struct Cli {
    /// Directory for config, journal and saved progress
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through a workout plan
    Run(run::RunArgs),
    /// Show a plan with defaults filled in
    Plan(plan::PlanArgs),
    /// Suggest sets, reps and weight for an exercise
    Advise(advise::AdviseArgs),
    /// Show logged sessions for an exercise
    History(history::HistoryArgs),
    /// Saved progress
    Resume(resume::ResumeArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<GwError>() {
                Some(friendly) => eprint!("{}", friendly),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Completions need no state
    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let state = StateDir::resolve(cli.state_dir)?;
    let _log_guard = logging::setup(&state)?;
    let config = state.load_config()?;
    tracing::debug!(state_dir = %state.root().display(), "starting");

    match cli.command {
        Commands::Run(args) => run::run(args, &state, config).await,
        Commands::Plan(args) => plan::plan(args, &config),
        Commands::Advise(args) => advise::advise(args, &state, &config).await,
        Commands::History(args) => history::history(args, &state, &config).await,
        Commands::Resume(args) => resume::handle(args, &state, config.snapshot_ttl),
        Commands::Completions(_) => Ok(()),
    }
}
