// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only workout journal
//!
//! One JSON entry per line. Performed sets and workout log records are
//! appended as they happen; exercise history is rebuilt by replaying it.

use chrono::{DateTime, NaiveDate, Utc};
use gw_core::{ExerciseRef, HistorySession, HistorySet, SessionLogMeta, SetLog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// Performed sets of one exercise
    SetLogs {
        exercise_id: String,
        name: String,
        logs: Vec<SetLog>,
    },
    /// A workout log record was opened or closed
    SessionLog { log_id: String, meta: SessionLogMeta },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub record: Record,
}

pub struct Journal {
    path: PathBuf,
    file: File,
    sequence: u64,
}

impl Journal {
    /// Open or create a journal at the given path
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let reader = BufReader::new(File::open(path)?);
        let sequence = reader.lines().count() as u64;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sequence,
        })
    }

    pub fn append(
        &mut self,
        at: DateTime<Utc>,
        client_id: Option<&str>,
        record: Record,
    ) -> Result<u64, JournalError> {
        let entry = JournalEntry {
            seq: self.sequence + 1,
            at,
            client_id: client_id.map(str::to_string),
            record,
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        self.sequence = entry.seq;
        Ok(self.sequence)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry back
    ///
    /// A missing journal is empty. A line that does not parse (a write torn
    /// by a crash) is skipped.
    pub fn replay(path: &Path) -> Result<Vec<JournalEntry>, JournalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<JournalEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    line = lineno + 1,
                    error = %e,
                    "skipping unreadable journal entry"
                ),
            }
        }
        Ok(entries)
    }
}

/// Past sessions of one exercise, most recent first
///
/// Set logs recorded on the same day form one session. Entries recorded
/// for another client are ignored when `client_id` is given.
pub fn history(
    entries: &[JournalEntry],
    client_id: Option<&str>,
    exercise: &ExerciseRef,
    limit: usize,
) -> Vec<HistorySession> {
    let mut by_date: BTreeMap<NaiveDate, Vec<HistorySet>> = BTreeMap::new();
    for entry in entries {
        if let (Some(want), Some(have)) = (client_id, entry.client_id.as_deref()) {
            if want != have {
                continue;
            }
        }
        let Record::SetLogs {
            exercise_id,
            name,
            logs,
        } = &entry.record
        else {
            continue;
        };
        let matches = match exercise {
            ExerciseRef::Id(id) => exercise_id == id,
            ExerciseRef::Name(wanted) => name.trim().eq_ignore_ascii_case(wanted.trim()),
        };
        if !matches || logs.is_empty() {
            continue;
        }
        by_date
            .entry(entry.at.date_naive())
            .or_default()
            .extend(
                logs.iter()
                    .map(|log| HistorySet::new(log.reps, log.weight.unwrap_or(0.0), log.effort)),
            );
    }
    by_date
        .into_iter()
        .rev()
        .take(limit)
        .map(|(date, sets)| HistorySession::new(date, sets))
        .collect()
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
