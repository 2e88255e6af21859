// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake history adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{HistoryAdapter, HistoryError};
use async_trait::async_trait;
use gw_core::{ExerciseRef, HistorySession};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded lookup
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryCall {
    pub client_id: Option<String>,
    pub exercise: ExerciseRef,
    pub limit: usize,
}

#[derive(Default)]
struct FakeState {
    sessions: HashMap<String, Vec<HistorySession>>,
    calls: Vec<HistoryCall>,
    failing: bool,
}

/// Fake history adapter for testing
///
/// History is keyed by exercise id or name, whichever the lookup uses.
#[derive(Clone, Default)]
pub struct FakeHistoryAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeHistoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_history(&self, key: &str, sessions: Vec<HistorySession>) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sessions
            .insert(key.to_string(), sessions);
    }

    /// Make every lookup fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).failing = failing;
    }

    /// Get all recorded lookups
    pub fn calls(&self) -> Vec<HistoryCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl HistoryAdapter for FakeHistoryAdapter {
    async fn lookup(
        &self,
        client_id: Option<&str>,
        exercise: &ExerciseRef,
        limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(HistoryCall {
            client_id: client_id.map(str::to_string),
            exercise: exercise.clone(),
            limit,
        });
        if state.failing {
            return Err(HistoryError::Unavailable("fake failure".to_string()));
        }
        let key = match exercise {
            ExerciseRef::Id(id) => id,
            ExerciseRef::Name(name) => name,
        };
        Ok(state
            .sessions
            .get(key)
            .map(|s| s.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
