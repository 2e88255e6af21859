// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workout logging: performed sets and the workout log record

mod journal;
mod noop;

pub use journal::JournalLogAdapter;
pub use noop::NoOpLogAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLogAdapter, LogCall};

use async_trait::async_trait;
use gw_core::{ExerciseId, SessionLogMeta, SetLog};
use thiserror::Error;

/// Errors from log writes
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log write failed: {0}")]
    WriteFailed(String),
}

/// Adapter for recording what was done
///
/// Callers treat every write as best-effort.
#[async_trait]
pub trait LogAdapter: Clone + Send + Sync + 'static {
    /// Record an exercise's performed sets
    async fn persist_set_logs(
        &self,
        exercise_id: &ExerciseId,
        name: &str,
        logs: &[SetLog],
    ) -> Result<(), LogError>;

    /// Open or close the workout log record
    async fn session_log(&self, meta: &SessionLogMeta) -> Result<(), LogError>;
}
