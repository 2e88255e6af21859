// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workout session data
//!
//! A session holds the exercise list, the current position and one
//! [`SetLog`] per prescribed set. Logs are created with prescribed defaults
//! when the session starts and overwritten as sets are reported.
//!
//! Completion is tracked per set index. A set is complete once it has been
//! performed or skipped; only performed sets are handed to persistence.
//! Separately, an exercise is *finished* once it has been reported complete.
//! Superset members finish together, so a member can have every set done
//! while still unfinished.

use crate::exercise::{Exercise, SetEntry, SetLog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub exercise: usize,
    pub set: usize,
}

impl Position {
    pub fn new(exercise: usize, set: usize) -> Self {
        Self { exercise, set }
    }
}

/// Wall-clock session time; keeps running while paused
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    base_secs: u64,
    since: Option<DateTime<Utc>>,
}

impl Elapsed {
    pub fn with_base(base_secs: u64) -> Self {
        Self {
            base_secs,
            since: None,
        }
    }

    /// Begin a counting segment; no-op if one is open
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.since.is_none() {
            self.since = Some(now);
        }
    }

    /// Fold the open segment into the base
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.base_secs = self.secs(now);
        self.since = None;
    }

    pub fn secs(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .since
            .map(|since| (now - since).num_seconds().max(0) as u64)
            .unwrap_or(0);
        self.base_secs + running
    }

    pub fn is_running(&self) -> bool {
        self.since.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SetProgress {
    completed: BTreeSet<usize>,
    skipped: BTreeSet<usize>,
    finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    exercises: Vec<Exercise>,
    pub position: Position,
    logs: Vec<Vec<SetLog>>,
    progress: Vec<SetProgress>,
    pub elapsed: Elapsed,
}

impl Session {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        let logs = exercises.iter().map(prescribed_logs).collect();
        let progress = vec![SetProgress::default(); exercises.len()];
        Self {
            exercises,
            position: Position::default(),
            logs,
            progress,
            elapsed: Elapsed::default(),
        }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn exercise(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.exercise(self.position.exercise)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn set_count(&self, index: usize) -> usize {
        self.exercise(index).map(Exercise::set_count).unwrap_or(0)
    }

    pub fn logs(&self, index: usize) -> &[SetLog] {
        self.logs.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_logs(&self) -> &[Vec<SetLog>] {
        &self.logs
    }

    pub fn completed_sets(&self, index: usize) -> Vec<usize> {
        self.progress
            .get(index)
            .map(|p| p.completed.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_set_complete(&self, index: usize, set: usize) -> bool {
        self.progress
            .get(index)
            .map(|p| p.completed.contains(&set))
            .unwrap_or(false)
    }

    pub fn is_exercise_complete(&self, index: usize) -> bool {
        let sets = self.set_count(index);
        sets > 0 && (0..sets).all(|s| self.is_set_complete(index, s))
    }

    pub fn first_incomplete_set(&self, index: usize) -> Option<usize> {
        (0..self.set_count(index)).find(|s| !self.is_set_complete(index, *s))
    }

    /// Record a performed set, merging any reported values into its log
    pub fn complete_set(&mut self, index: usize, set: usize, entry: Option<&SetEntry>) {
        if set >= self.set_count(index) {
            return;
        }
        if let (Some(entry), Some(log)) = (
            entry,
            self.logs.get_mut(index).and_then(|logs| logs.get_mut(set)),
        ) {
            entry.apply_to(log);
        }
        if let Some(progress) = self.progress.get_mut(index) {
            progress.completed.insert(set);
            progress.skipped.remove(&set);
        }
    }

    pub fn is_finished(&self, index: usize) -> bool {
        self.progress.get(index).map(|p| p.finished).unwrap_or(false)
    }

    /// Report the exercise complete
    pub fn finish(&mut self, index: usize) {
        if let Some(progress) = self.progress.get_mut(index) {
            progress.finished = true;
        }
    }

    pub fn finished(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| self.is_finished(*i)).collect()
    }

    /// Mark every not-yet-complete set as skipped
    pub fn skip_remaining(&mut self, index: usize) {
        let sets = self.set_count(index);
        if let Some(progress) = self.progress.get_mut(index) {
            for set in 0..sets {
                if progress.completed.insert(set) {
                    progress.skipped.insert(set);
                }
            }
        }
    }

    /// Forget completion and finish so the exercise can be played again
    pub fn reopen(&mut self, index: usize) {
        if let Some(progress) = self.progress.get_mut(index) {
            *progress = SetProgress::default();
        }
    }

    /// Logs of sets actually performed, in set order
    pub fn performed_logs(&self, index: usize) -> Vec<SetLog> {
        let Some(progress) = self.progress.get(index) else {
            return Vec::new();
        };
        self.logs(index)
            .iter()
            .enumerate()
            .filter(|(set, _)| {
                progress.completed.contains(set) && !progress.skipped.contains(set)
            })
            .map(|(_, log)| log.clone())
            .collect()
    }

    pub fn total_sets(&self) -> usize {
        (0..self.len()).map(|i| self.set_count(i)).sum()
    }

    pub fn completed_set_count(&self) -> usize {
        self.progress.iter().map(|p| p.completed.len()).sum()
    }

    pub fn completed_exercise_count(&self) -> usize {
        self.progress.iter().filter(|p| p.finished).count()
    }

    /// Completed sets over prescribed sets, as a rounded percentage
    pub fn progress_pct(&self) -> u8 {
        let total = self.total_sets();
        if total == 0 {
            return 0;
        }
        let pct = (self.completed_set_count() as f64 / total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    pub fn is_all_finished(&self) -> bool {
        self.progress.iter().all(|p| p.finished)
    }

    /// Swap in an edited exercise list
    ///
    /// Progress and logs follow exercises by id so a reorder keeps what was
    /// done. The position is clamped into range.
    pub fn replace_exercises(&mut self, exercises: Vec<Exercise>) {
        let mut carried: HashMap<String, (Vec<SetLog>, SetProgress)> = HashMap::new();
        for (i, exercise) in self.exercises.iter().enumerate() {
            let logs = self.logs.get(i).cloned().unwrap_or_default();
            let progress = self.progress.get(i).cloned().unwrap_or_default();
            carried.entry(exercise.id.0.clone()).or_insert((logs, progress));
        }

        let mut logs = Vec::with_capacity(exercises.len());
        let mut progress = Vec::with_capacity(exercises.len());
        for exercise in &exercises {
            let sets = exercise.set_count();
            match carried.remove(&exercise.id.0) {
                Some((mut old_logs, mut old_progress)) => {
                    old_logs.truncate(sets);
                    while old_logs.len() < sets {
                        old_logs.push(SetLog::prescribed(exercise));
                    }
                    old_progress.completed.retain(|s| *s < sets);
                    old_progress.skipped.retain(|s| *s < sets);
                    logs.push(old_logs);
                    progress.push(old_progress);
                }
                None => {
                    logs.push(prescribed_logs(exercise));
                    progress.push(SetProgress::default());
                }
            }
        }

        self.exercises = exercises;
        self.logs = logs;
        self.progress = progress;
        self.clamp_position();
    }

    /// Pull the position back into range; false if there is nothing to point at
    pub fn clamp_position(&mut self) -> bool {
        if self.exercises.is_empty() {
            self.position = Position::default();
            return false;
        }
        self.position.exercise = self.position.exercise.min(self.exercises.len() - 1);
        let sets = self.set_count(self.position.exercise);
        self.position.set = self.position.set.min(sets.saturating_sub(1));
        true
    }

    /// Reapply saved progress; out-of-range entries are ignored
    pub fn restore_progress(
        &mut self,
        completed: &[Vec<usize>],
        finished: &[usize],
        logs: &[Vec<SetLog>],
    ) {
        for (index, sets) in completed.iter().enumerate() {
            let count = self.set_count(index);
            if let Some(progress) = self.progress.get_mut(index) {
                progress.completed = sets.iter().copied().filter(|s| *s < count).collect();
            }
        }
        for index in finished {
            self.finish(*index);
        }
        for (index, saved) in logs.iter().enumerate() {
            let Some(current) = self.logs.get_mut(index) else {
                continue;
            };
            for (slot, log) in current.iter_mut().zip(saved) {
                *slot = log.clone();
            }
        }
    }
}

fn prescribed_logs(exercise: &Exercise) -> Vec<SetLog> {
    vec![SetLog::prescribed(exercise); exercise.set_count()]
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
