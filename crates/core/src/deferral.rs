// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deferred ("do later") exercises
//!
//! Entries are representative exercise indices: the first member for a
//! superset group, the exercise itself otherwise. An entry stays queued
//! until every set it covers is logged or explicitly skipped.

use crate::exercise::WorkoutPhase;
use serde::{Deserialize, Serialize};

/// Which deferred entries a boundary crossing must resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "phase")]
pub enum Boundary {
    /// Moving from one workout phase into another
    Leaving(WorkoutPhase),
    /// No exercises left
    End,
}

impl Boundary {
    /// Boundary crossed when moving from `from` to `to` (`None` = end)
    pub fn between(from: WorkoutPhase, to: Option<WorkoutPhase>) -> Option<Boundary> {
        match to {
            None => Some(Boundary::End),
            Some(next) if next != from => Some(Boundary::Leaving(from)),
            Some(_) => None,
        }
    }

    /// Whether an entry tagged `phase` is due at this boundary
    pub fn covers(self, phase: WorkoutPhase) -> bool {
        match self {
            Boundary::Leaving(left) => left == phase,
            Boundary::End => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeferralQueue {
    entries: Vec<usize>,
}

impl DeferralQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = usize>) -> Self {
        let mut queue = Self::new();
        for entry in entries {
            queue.defer(entry);
        }
        queue
    }

    /// Queue an entry; returns false if it was already queued
    pub fn defer(&mut self, representative: usize) -> bool {
        if self.entries.contains(&representative) {
            return false;
        }
        self.entries.push(representative);
        true
    }

    pub fn remove(&mut self, representative: usize) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| *e != representative);
        self.entries.len() != before
    }

    pub fn contains(&self, representative: usize) -> bool {
        self.entries.contains(&representative)
    }

    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop entries whose sets are all done
    pub fn prune(&mut self, is_complete: impl Fn(usize) -> bool) {
        self.entries.retain(|e| !is_complete(*e));
    }

    /// Drop entries that no longer point at an exercise
    pub fn clamp(&mut self, len: usize) {
        self.entries.retain(|e| *e < len);
    }

    /// Unresolved entries due at `boundary`, in the order they were deferred
    pub fn due(
        &self,
        boundary: Boundary,
        phase_of: impl Fn(usize) -> Option<WorkoutPhase>,
        is_complete: impl Fn(usize) -> bool,
        exclude: Option<usize>,
    ) -> Vec<usize> {
        self.entries
            .iter()
            .copied()
            .filter(|e| Some(*e) != exclude)
            .filter(|e| phase_of(*e).map(|p| boundary.covers(p)).unwrap_or(false))
            .filter(|e| !is_complete(*e))
            .collect()
    }
}

#[cfg(test)]
#[path = "deferral_tests.rs"]
mod tests;
