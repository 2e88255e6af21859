// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake log adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LogAdapter, LogError};
use async_trait::async_trait;
use gw_core::{ExerciseId, SessionLogMeta, SetLog};
use std::sync::{Arc, Mutex};

/// Recorded log write (failed writes included)
#[derive(Debug, Clone, PartialEq)]
pub enum LogCall {
    PersistSetLogs {
        exercise_id: String,
        name: String,
        logs: Vec<SetLog>,
    },
    SessionLog(SessionLogMeta),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<LogCall>,
    /// Number of upcoming set-log writes that fail
    failures: usize,
}

/// Fake log adapter for testing
#[derive(Clone, Default)]
pub struct FakeLogAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeLogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` set-log writes
    pub fn fail_next(&self, n: usize) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).failures = n;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LogCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Exercise ids of set-log writes, in call order
    pub fn persisted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LogCall::PersistSetLogs { exercise_id, .. } => Some(exercise_id),
                LogCall::SessionLog(_) => None,
            })
            .collect()
    }

    pub fn session_logs(&self) -> Vec<SessionLogMeta> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                LogCall::SessionLog(meta) => Some(meta),
                LogCall::PersistSetLogs { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl LogAdapter for FakeLogAdapter {
    async fn persist_set_logs(
        &self,
        exercise_id: &ExerciseId,
        name: &str,
        logs: &[SetLog],
    ) -> Result<(), LogError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(LogCall::PersistSetLogs {
            exercise_id: exercise_id.to_string(),
            name: name.to_string(),
            logs: logs.to_vec(),
        });
        if state.failures > 0 {
            state.failures -= 1;
            return Err(LogError::WriteFailed("fake failure".to_string()));
        }
        Ok(())
    }

    async fn session_log(&self, meta: &SessionLogMeta) -> Result<(), LogError> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .push(LogCall::SessionLog(meta.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
