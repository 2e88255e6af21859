// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw history <exercise>` - Past sessions and personal bests

use crate::error::GwError;
use crate::output::{self, weight, OutputFormat};
use crate::state::StateDir;
use anyhow::Result;
use clap::Args;
use gw_adapters::{HistoryAdapter, JournalHistoryAdapter, TracedHistoryAdapter};
use gw_core::{EngineConfig, ExerciseRef, HistorySession, HistoryStats, WeightUnit};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct HistoryArgs {
    /// Exercise id or name
    pub exercise: String,

    /// Most sessions to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,
}

#[derive(Serialize)]
struct HistoryReport {
    exercise: String,
    sessions: Vec<HistorySession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<HistoryStats>,
    #[serde(skip)]
    unit: WeightUnit,
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.exercise)?;
        for session in &self.sessions {
            let sets: Vec<String> = session
                .sets
                .iter()
                .map(|s| {
                    if s.weight > 0.0 {
                        format!("{}x{}", s.reps, weight(s.weight))
                    } else {
                        s.reps.to_string()
                    }
                })
                .collect();
            writeln!(f, "  {}  {}", session.date, sets.join(", "))?;
        }
        if let Some(stats) = &self.stats {
            writeln!(f)?;
            writeln!(
                f,
                "  best: {} {} (recent {} {})",
                weight(stats.all_time_max_weight),
                self.unit,
                weight(stats.recent_max_weight),
                self.unit
            )?;
            writeln!(
                f,
                "  workouts: {}, PRs: {}, average volume: {}",
                stats.total_workouts,
                stats.pr_count,
                weight(stats.average_volume)
            )?;
        }
        Ok(())
    }
}

pub async fn history(args: HistoryArgs, state: &StateDir, config: &EngineConfig) -> Result<()> {
    let sessions = lookup(state, config, &args.exercise, args.limit).await?;
    if sessions.is_empty() {
        return Err(GwError::no_history(&args.exercise).into());
    }
    let report = HistoryReport {
        exercise: args.exercise,
        stats: HistoryStats::from_sessions(&sessions),
        sessions,
        unit: config.progression.unit,
    };
    output::print(&report, args.output)?;
    Ok(())
}

/// Sessions logged for an exercise id, else for an exercise of that name
pub async fn lookup(
    state: &StateDir,
    config: &EngineConfig,
    exercise: &str,
    limit: usize,
) -> Result<Vec<HistorySession>> {
    let adapter = TracedHistoryAdapter::new(JournalHistoryAdapter::new(state.journal_path()));
    let client = config.client_id.as_deref();

    let by_id = adapter
        .lookup(client, &ExerciseRef::Id(exercise.to_string()), limit)
        .await?;
    if !by_id.is_empty() {
        return Ok(by_id);
    }
    Ok(adapter
        .lookup(client, &ExerciseRef::Name(exercise.to_string()), limit)
        .await?)
}
