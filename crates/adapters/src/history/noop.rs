// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op history adapter for when there is nowhere to read history from.

use super::{HistoryAdapter, HistoryError};
use async_trait::async_trait;
use gw_core::{ExerciseRef, HistorySession};

/// History adapter that never has any history.
///
/// Every exercise looks brand new, so no recommendation is ever made.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpHistoryAdapter;

impl NoOpHistoryAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HistoryAdapter for NoOpHistoryAdapter {
    async fn lookup(
        &self,
        _client_id: Option<&str>,
        _exercise: &ExerciseRef,
        _limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError> {
        Ok(Vec::new())
    }
}
