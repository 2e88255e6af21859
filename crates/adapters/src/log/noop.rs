// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op log adapter for workouts that should leave no record.

use super::{LogAdapter, LogError};
use async_trait::async_trait;
use gw_core::{ExerciseId, SessionLogMeta, SetLog};

/// Log adapter that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogAdapter;

impl NoOpLogAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogAdapter for NoOpLogAdapter {
    async fn persist_set_logs(
        &self,
        _exercise_id: &ExerciseId,
        _name: &str,
        _logs: &[SetLog],
    ) -> Result<(), LogError> {
        Ok(())
    }

    async fn session_log(&self, _meta: &SessionLogMeta) -> Result<(), LogError> {
        Ok(())
    }
}
