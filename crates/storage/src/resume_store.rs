// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resume snapshot persistence
//!
//! One JSON file per workout under the store directory. Saves write a
//! temporary file and rename it over the old one, so a reader never sees
//! a half-written snapshot.

use chrono::{DateTime, Utc};
use gw_core::id::slugify;
use gw_core::ResumeSnapshot;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ResumeStore {
    dir: PathBuf,
}

impl ResumeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for a workout name
    pub fn path_for(&self, workout: &str) -> PathBuf {
        let slug = slugify(workout);
        let slug = if slug.is_empty() { "workout".to_string() } else { slug };
        self.dir.join(format!("{}.json", slug))
    }

    pub fn save(&self, workout: &str, snapshot: &ResumeSnapshot) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(workout);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(
            path = %path.display(),
            exercise_index = snapshot.exercise_index,
            set_index = snapshot.set_index,
            "snapshot saved"
        );
        Ok(())
    }

    /// Read the stored snapshot as-is, without validating it
    pub fn load(&self, workout: &str) -> Result<Option<ResumeSnapshot>, StoreError> {
        let path = self.path_for(workout);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// A snapshot the live workout can resume from, if there is one
    ///
    /// Anything unusable (unreadable, expired, for a different exercise
    /// count) is discarded silently and removed.
    pub fn load_valid(
        &self,
        workout: &str,
        live_exercise_count: usize,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<ResumeSnapshot> {
        let snapshot = match self.load(workout) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(workout, error = %e, "discarding unreadable snapshot");
                self.discard(workout);
                return None;
            }
        };
        match snapshot.validate(live_exercise_count, now, ttl) {
            Ok(()) => Some(snapshot),
            Err(reason) => {
                tracing::debug!(workout, %reason, "discarding snapshot");
                self.discard(workout);
                None
            }
        }
    }

    /// Remove a workout's snapshot; a missing one is fine
    pub fn clear(&self, workout: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(workout)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Every readable snapshot in the store, keyed by file stem
    pub fn list(&self) -> Result<Vec<(String, ResumeSnapshot)>, StoreError> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut snapshots = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match std::fs::read(&path)
                .map_err(StoreError::from)
                .and_then(|bytes| Ok(serde_json::from_slice(&bytes)?))
            {
                Ok(snapshot) => snapshots.push((stem.to_string(), snapshot)),
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping snapshot"),
            }
        }
        snapshots.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(snapshots)
    }

    fn discard(&self, workout: &str) {
        if let Err(e) = self.clear(workout) {
            tracing::warn!(workout, error = %e, "failed to remove snapshot");
        }
    }
}

#[cfg(test)]
#[path = "resume_store_tests.rs"]
mod tests;
