// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log adapter backed by the workout journal

use super::{LogAdapter, LogError};
use async_trait::async_trait;
use gw_core::{Clock, ExerciseId, IdGen, SessionLogMeta, SetLog};
use gw_storage::{Journal, Record};
use std::sync::{Arc, Mutex};

/// Appends set logs and workout log records to a [`Journal`]
///
/// Opening a workout log assigns it an id; the matching close reuses it.
#[derive(Clone)]
pub struct JournalLogAdapter<C, I> {
    journal: Arc<Mutex<Journal>>,
    clock: C,
    ids: I,
    client_id: Option<String>,
    open_log: Arc<Mutex<Option<String>>>,
}

impl<C: Clock, I: IdGen> JournalLogAdapter<C, I> {
    pub fn new(journal: Journal, clock: C, ids: I, client_id: Option<String>) -> Self {
        Self {
            journal: Arc::new(Mutex::new(journal)),
            clock,
            ids,
            client_id,
            open_log: Arc::new(Mutex::new(None)),
        }
    }

    fn append(&self, record: Record) -> Result<u64, LogError> {
        let now = self.clock.now();
        self.journal
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .append(now, self.client_id.as_deref(), record)
            .map_err(|e| LogError::WriteFailed(e.to_string()))
    }
}

#[async_trait]
impl<C, I> LogAdapter for JournalLogAdapter<C, I>
where
    C: Clock + 'static,
    I: IdGen + 'static,
{
    async fn persist_set_logs(
        &self,
        exercise_id: &ExerciseId,
        name: &str,
        logs: &[SetLog],
    ) -> Result<(), LogError> {
        if logs.is_empty() {
            return Ok(());
        }
        self.append(Record::SetLogs {
            exercise_id: exercise_id.to_string(),
            name: name.to_string(),
            logs: logs.to_vec(),
        })?;
        Ok(())
    }

    async fn session_log(&self, meta: &SessionLogMeta) -> Result<(), LogError> {
        let log_id = {
            let mut open = self.open_log.lock().unwrap_or_else(|e| e.into_inner());
            match meta {
                SessionLogMeta::Open { .. } => {
                    let id = self.ids.next();
                    *open = Some(id.clone());
                    id
                }
                SessionLogMeta::Close { .. } => open.take().unwrap_or_else(|| self.ids.next()),
            }
        };
        self.append(Record::SessionLog {
            log_id,
            meta: meta.clone(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
