// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History read back from the workout journal

use super::{HistoryAdapter, HistoryError};
use async_trait::async_trait;
use gw_core::{ExerciseRef, HistorySession};
use gw_storage::Journal;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct JournalHistoryAdapter {
    path: PathBuf,
}

impl JournalHistoryAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryAdapter for JournalHistoryAdapter {
    async fn lookup(
        &self,
        client_id: Option<&str>,
        exercise: &ExerciseRef,
        limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError> {
        let entries =
            Journal::replay(&self.path).map_err(|e| HistoryError::Unavailable(e.to_string()))?;
        Ok(gw_storage::history(&entries, client_id, exercise, limit))
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
