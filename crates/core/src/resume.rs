// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume snapshot
//!
//! The only artifact with stable field names: it may be read back by a
//! different process after a crash. A snapshot is usable only while it is
//! younger than the TTL and the live workout has the same exercise count.

use crate::exercise::SetLog;
use crate::superset::SupersetState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot TTL when no config overrides it
pub const DEFAULT_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub exercise_index: usize,
    pub set_index: usize,
    pub elapsed_secs: u64,
    /// Completed set indices, per exercise
    pub completed: Vec<Vec<usize>>,
    /// Exercises reported complete
    #[serde(default)]
    pub finished: Vec<usize>,
    pub logs: Vec<Vec<SetLog>>,
    /// Deferred representative indices, in deferral order
    #[serde(default)]
    pub deferred: Vec<usize>,
    #[serde(default)]
    pub pending_next: Option<usize>,
    #[serde(default)]
    pub superset: Option<SupersetState>,
    pub exercise_name: String,
    pub exercise_count: usize,
    pub saved_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Why a stored snapshot cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("snapshot expired ({age_secs}s old)")]
    Expired { age_secs: u64 },
    #[error("snapshot has {saved} exercises, workout has {live}")]
    CountMismatch { saved: usize, live: usize },
    #[error("unsupported snapshot version {0}")]
    Version(u32),
}

impl ResumeSnapshot {
    /// Seconds since the snapshot was saved; a future timestamp counts as zero
    pub fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.saved_at).num_seconds().max(0) as u64
    }

    pub fn validate(
        &self,
        live_exercise_count: usize,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(), Rejection> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Rejection::Version(self.version));
        }
        let age_secs = self.age_secs(now);
        if age_secs >= ttl.as_secs() {
            return Err(Rejection::Expired { age_secs });
        }
        if self.exercise_count != live_exercise_count {
            return Err(Rejection::CountMismatch {
                saved: self.exercise_count,
                live: live_exercise_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "resume_tests.rs"]
mod tests;
