// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw plan <file>` - Show a plan the way a workout will run it

use super::run::load_plan;
use crate::console::prescription;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use gw_core::{EngineConfig, Exercise, WeightUnit, WorkoutPhase};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct PlanArgs {
    /// Workout plan (TOML)
    pub plan: PathBuf,

    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Serialize)]
struct PlanSummary {
    name: String,
    exercises: Vec<Exercise>,
    #[serde(skip)]
    unit: WeightUnit,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} exercises)", self.name, self.exercises.len())?;
        for (i, exercise) in self.exercises.iter().enumerate() {
            write!(
                f,
                "\n  {}. {}: {} x {}, rest {}s",
                i + 1,
                exercise.name,
                exercise.set_count(),
                prescription(exercise, self.unit),
                exercise.rest_secs
            )?;
            if let Some(group) = &exercise.group {
                write!(f, " [superset {}]", group)?;
            }
            if exercise.phase != WorkoutPhase::Main {
                write!(f, " ({})", exercise.phase)?;
            }
        }
        Ok(())
    }
}

pub fn plan(args: PlanArgs, config: &EngineConfig) -> Result<()> {
    let (name, exercises) = load_plan(&args.plan, config)?;
    let summary = PlanSummary {
        name,
        exercises,
        unit: config.progression.unit,
    };
    output::print(&summary, args.output)?;
    Ok(())
}
