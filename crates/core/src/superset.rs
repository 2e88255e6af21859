// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Superset grouping and round cycling
//!
//! Groups are computed once from the exercise list. A label only forms a
//! group when two or more *contiguous* exercises share it; anything else is
//! treated as a standalone exercise.

use crate::exercise::Exercise;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A contiguous run of exercises performed back-to-back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupersetGroup {
    pub label: String,
    pub start: usize,
    /// Inclusive
    pub end: usize,
    /// Largest prescribed set count across members
    pub total_rounds: usize,
}

impl SupersetGroup {
    pub fn members(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members().contains(&index)
    }

    pub fn member_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Position inside the active group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupersetState {
    /// Index of the group's first exercise
    pub group_start: usize,
    /// Offset of the current member from `group_start`
    pub member_pos: usize,
    /// Zero-based round; doubles as the set index of every member
    pub round: usize,
}

impl SupersetState {
    pub fn exercise_index(&self) -> usize {
        self.group_start + self.member_pos
    }
}

/// What follows a member finishing its set for the current round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStep {
    /// Straight into the next member, no rest
    NextMember(SupersetState),
    /// Round finished: rest once, then start the next round here
    NextRound(SupersetState),
    /// Last round finished
    GroupComplete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupersetCoordinator {
    groups: Vec<SupersetGroup>,
}

impl SupersetCoordinator {
    pub fn new(exercises: &[Exercise]) -> Self {
        Self {
            groups: detect_groups(exercises),
        }
    }

    pub fn groups(&self) -> &[SupersetGroup] {
        &self.groups
    }

    pub fn group_of(&self, index: usize) -> Option<&SupersetGroup> {
        self.groups.iter().find(|g| g.contains(index))
    }

    /// Group's first index for members, the index itself otherwise
    pub fn representative(&self, index: usize) -> usize {
        self.group_of(index).map(|g| g.start).unwrap_or(index)
    }

    /// Every exercise index the unit at `index` covers
    pub fn unit(&self, index: usize) -> RangeInclusive<usize> {
        self.group_of(index)
            .map(|g| g.members())
            .unwrap_or(index..=index)
    }

    /// First member with a set in `round`
    pub fn first_in_round(
        &self,
        group: &SupersetGroup,
        round: usize,
        exercises: &[Exercise],
    ) -> Option<SupersetState> {
        self.member_from(group, 0, round, exercises)
    }

    /// Decide where a group goes after `state`'s member finished its set
    pub fn after_member_done(
        &self,
        group: &SupersetGroup,
        state: &SupersetState,
        exercises: &[Exercise],
    ) -> RoundStep {
        if let Some(next) = self.member_from(group, state.member_pos + 1, state.round, exercises) {
            return RoundStep::NextMember(next);
        }
        let round = state.round + 1;
        if round < group.total_rounds {
            if let Some(next) = self.first_in_round(group, round, exercises) {
                return RoundStep::NextRound(next);
            }
        }
        RoundStep::GroupComplete
    }

    // Members prescribed fewer sets than the group sit out later rounds
    fn member_from(
        &self,
        group: &SupersetGroup,
        from: usize,
        round: usize,
        exercises: &[Exercise],
    ) -> Option<SupersetState> {
        (from..group.member_count())
            .find(|pos| {
                exercises
                    .get(group.start + pos)
                    .map(|e| e.set_count() > round)
                    .unwrap_or(false)
            })
            .map(|member_pos| SupersetState {
                group_start: group.start,
                member_pos,
                round,
            })
    }
}

/// Maximal contiguous same-label runs of two or more exercises
pub fn detect_groups(exercises: &[Exercise]) -> Vec<SupersetGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < exercises.len() {
        let Some(label) = exercises[i].group.as_deref() else {
            i += 1;
            continue;
        };
        let mut end = i;
        while end + 1 < exercises.len() && exercises[end + 1].group.as_deref() == Some(label) {
            end += 1;
        }
        if end > i {
            let total_rounds = exercises[i..=end]
                .iter()
                .map(Exercise::set_count)
                .max()
                .unwrap_or(1);
            groups.push(SupersetGroup {
                label: label.to_string(),
                start: i,
                end,
                total_rounds,
            });
        }
        i = end + 1;
    }
    groups
}

#[cfg(test)]
#[path = "superset_tests.rs"]
mod tests;
