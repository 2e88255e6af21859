// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::history::{HistoryAdapter, HistoryError};
use crate::log::{LogAdapter, LogError};
use async_trait::async_trait;
use gw_core::{ExerciseId, ExerciseRef, HistorySession, SessionLogMeta, SetLog};

/// Wrapper that adds tracing to any HistoryAdapter
#[derive(Clone)]
pub struct TracedHistoryAdapter<H> {
    inner: H,
}

impl<H> TracedHistoryAdapter<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: HistoryAdapter> HistoryAdapter for TracedHistoryAdapter<H> {
    async fn lookup(
        &self,
        client_id: Option<&str>,
        exercise: &ExerciseRef,
        limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError> {
        let span = tracing::info_span!("history.lookup", ?exercise, limit);
        let _guard = span.enter();

        tracing::info!(client = client_id.unwrap_or("-"), "starting");

        let start = std::time::Instant::now();
        let result = self.inner.lookup(client_id, exercise, limit).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(sessions) => tracing::info!(
                sessions = sessions.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "history loaded"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "lookup failed"
            ),
        }

        result
    }
}

/// Wrapper that adds tracing to any LogAdapter
#[derive(Clone)]
pub struct TracedLogAdapter<L> {
    inner: L,
}

impl<L> TracedLogAdapter<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: LogAdapter> LogAdapter for TracedLogAdapter<L> {
    async fn persist_set_logs(
        &self,
        exercise_id: &ExerciseId,
        name: &str,
        logs: &[SetLog],
    ) -> Result<(), LogError> {
        let span = tracing::info_span!("log.persist_set_logs", exercise_id = %exercise_id, name);
        let _guard = span.enter();

        tracing::info!(sets = logs.len(), "starting");

        let start = std::time::Instant::now();
        let result = self.inner.persist_set_logs(exercise_id, name, logs).await;
        let elapsed = start.elapsed();

        // Failures are retried by the caller
        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "sets logged"),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "persist failed"
            ),
        }

        result
    }

    async fn session_log(&self, meta: &SessionLogMeta) -> Result<(), LogError> {
        let action = match meta {
            SessionLogMeta::Open { .. } => "open",
            SessionLogMeta::Close { .. } => "close",
        };
        let span = tracing::info_span!("log.session", action);
        let _guard = span.enter();

        let result = self.inner.session_log(meta).await;
        match &result {
            Ok(()) => tracing::info!("recorded"),
            Err(e) => tracing::warn!(error = %e, "session log failed"),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
