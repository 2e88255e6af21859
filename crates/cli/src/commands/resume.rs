// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw resume` - Inspect and discard saved progress

use crate::error::GwError;
use crate::output::{self, clock_time, OutputFormat};
use crate::state::StateDir;
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use gw_core::ResumeSnapshot;
use gw_storage::ResumeStore;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ResumeArgs {
    #[command(subcommand)]
    pub command: ResumeCommand,
}

#[derive(Subcommand)]
pub enum ResumeCommand {
    /// List workouts with saved progress
    List {
        #[arg(short = 'o', long = "output", value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Show where a workout will pick up
    Show {
        /// Workout name
        workout: String,
        #[arg(short = 'o', long = "output", value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Discard a workout's saved progress
    Clear {
        /// Workout name
        workout: String,
    },
}

#[derive(Serialize)]
struct SavedProgress {
    workout: String,
    exercise: String,
    exercise_index: usize,
    exercise_count: usize,
    set_index: usize,
    elapsed_secs: u64,
    deferred: usize,
    saved_at: DateTime<Utc>,
    expired: bool,
}

impl SavedProgress {
    fn new(workout: String, snapshot: &ResumeSnapshot, ttl: std::time::Duration) -> Self {
        Self {
            workout,
            exercise: snapshot.exercise_name.clone(),
            exercise_index: snapshot.exercise_index,
            exercise_count: snapshot.exercise_count,
            set_index: snapshot.set_index,
            elapsed_secs: snapshot.elapsed_secs,
            deferred: snapshot.deferred.len(),
            saved_at: snapshot.saved_at,
            expired: snapshot.age_secs(Utc::now()) >= ttl.as_secs(),
        }
    }
}

impl fmt::Display for SavedProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (exercise {} of {}, set {}), {} elapsed",
            self.workout,
            self.exercise,
            self.exercise_index + 1,
            self.exercise_count,
            self.set_index + 1,
            clock_time(self.elapsed_secs)
        )?;
        if self.deferred > 0 {
            write!(f, ", {} deferred", self.deferred)?;
        }
        if self.expired {
            write!(f, " [expired]")?;
        }
        Ok(())
    }
}

pub fn handle(args: ResumeArgs, state: &StateDir, ttl: std::time::Duration) -> Result<()> {
    let store = ResumeStore::new(state.snapshots_dir());
    match args.command {
        ResumeCommand::List { output } => {
            let saved: Vec<SavedProgress> = store
                .list()?
                .into_iter()
                .map(|(key, snapshot)| SavedProgress::new(key, &snapshot, ttl))
                .collect();
            output::print_list(&saved, output, "No saved progress")?;
        }
        ResumeCommand::Show { workout, output } => {
            let snapshot = store
                .load(&workout)?
                .ok_or_else(|| GwError::snapshot_not_found(&workout))?;
            output::print(&SavedProgress::new(workout, &snapshot, ttl), output)?;
        }
        ResumeCommand::Clear { workout } => {
            if store.load(&workout)?.is_none() {
                return Err(GwError::snapshot_not_found(&workout).into());
            }
            store.clear(&workout)?;
            println!("Cleared saved progress for {}", workout);
        }
    }
    Ok(())
}
