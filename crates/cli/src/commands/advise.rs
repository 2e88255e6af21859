// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw advise <exercise>` - Suggest the next prescription from history

use super::history::lookup;
use crate::console::describe_recommendation;
use crate::error::GwError;
use crate::output::{self, OutputFormat};
use crate::state::StateDir;
use anyhow::Result;
use clap::Args;
use gw_core::{recommend, EngineConfig, ProgressionInput, Recommendation, WeightUnit};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct AdviseArgs {
    /// Exercise id or name
    pub exercise: String,

    /// Prescribed reps (default from config)
    #[arg(long)]
    pub reps: Option<u32>,

    /// Treat as a compound lift (default: guessed from the name)
    #[arg(long, conflicts_with = "isolation")]
    pub compound: bool,

    /// Treat as an isolation exercise
    #[arg(long)]
    pub isolation: bool,

    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Serialize)]
struct Advice {
    exercise: String,
    #[serde(flatten)]
    recommendation: Recommendation,
    unit: WeightUnit,
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.exercise,
            describe_recommendation(&self.recommendation, self.unit)
        )
    }
}

pub async fn advise(args: AdviseArgs, state: &StateDir, config: &EngineConfig) -> Result<()> {
    let history = lookup(state, config, &args.exercise, config.history_limit).await?;
    let compound = match (args.compound, args.isolation) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let input = ProgressionInput {
        name: &args.exercise,
        compound,
        prescribed_reps: args.reps.unwrap_or(config.default_reps),
        history: &history,
        // Advice is for the next session, so today's sets count
        today: None,
    };
    let recommendation = recommend(&input, &config.progression)
        .ok_or_else(|| GwError::no_history(&args.exercise))?;

    let advice = Advice {
        exercise: args.exercise,
        recommendation,
        unit: config.progression.unit,
    };
    output::print(&advice, args.output)?;
    Ok(())
}
