// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exercise history lookup

mod journal;
mod noop;

pub use journal::JournalHistoryAdapter;
pub use noop::NoOpHistoryAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHistoryAdapter, HistoryCall};

use async_trait::async_trait;
use gw_core::{ExerciseRef, HistorySession};
use thiserror::Error;

/// Errors from history lookups
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for past performances of an exercise
#[async_trait]
pub trait HistoryAdapter: Clone + Send + Sync + 'static {
    /// Up to `limit` past sessions, most recent first
    async fn lookup(
        &self,
        client_id: Option<&str>,
        exercise: &ExerciseRef,
        limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError>;
}
