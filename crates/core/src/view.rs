// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only view of a workout for observers

use crate::exercise::{TrackingKind, WorkoutPhase};
use crate::progression::Recommendation;
use crate::workout::{Phase, Workout};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutView {
    pub workout: String,
    pub phase: Phase,
    /// Zero-based
    pub exercise_index: usize,
    pub exercise_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseView>,
    /// Zero-based
    pub set_index: usize,
    pub set_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u32>,
    pub paused: bool,
    pub elapsed_secs: u64,
    pub progress_pct: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superset: Option<SupersetView>,
    pub deferred: Vec<DeferredView>,
    /// Entries the current review is asking about
    pub review: Vec<DeferredView>,
    pub replay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseView {
    pub id: String,
    pub name: String,
    pub tracking: TrackingKind,
    pub phase: WorkoutPhase,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub duration_secs: u32,
    pub rest_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupersetView {
    pub label: String,
    /// Zero-based
    pub round: usize,
    pub total_rounds: usize,
    pub member_pos: usize,
    pub member_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredView {
    pub exercise_index: usize,
    pub name: String,
    pub phase: WorkoutPhase,
}

impl WorkoutView {
    pub fn of(workout: &Workout, now: DateTime<Utc>) -> Self {
        let session = workout.session();
        let position = workout.position();
        let exercise = session.current().map(|e| ExerciseView {
            id: e.id.to_string(),
            name: e.name.clone(),
            tracking: e.tracking,
            phase: e.phase,
            reps: e.reps,
            weight: e.weight,
            duration_secs: e.duration_secs,
            rest_secs: e.rest_secs,
        });
        let superset = workout.superset().and_then(|state| {
            let group = workout.supersets().group_of(state.group_start)?;
            Some(SupersetView {
                label: group.label.clone(),
                round: state.round,
                total_rounds: group.total_rounds,
                member_pos: state.member_pos,
                member_count: group.member_count(),
            })
        });
        let describe = |index: usize| {
            session.exercise(index).map(|e| DeferredView {
                exercise_index: index,
                name: e.name.clone(),
                phase: e.phase,
            })
        };

        Self {
            workout: workout.name().to_string(),
            phase: workout.phase(),
            exercise_index: position.exercise,
            exercise_count: session.len(),
            exercise,
            set_index: position.set,
            set_count: session.set_count(position.exercise),
            remaining_secs: workout.remaining_secs(now),
            paused: workout.is_paused(),
            elapsed_secs: workout.elapsed_secs(now),
            progress_pct: session.progress_pct(),
            up_next: workout
                .up_next()
                .and_then(|i| session.exercise(i))
                .map(|e| e.name.clone()),
            recommendation: workout.recommendation(position.exercise).cloned(),
            superset,
            deferred: workout
                .deferred()
                .entries()
                .iter()
                .filter_map(|i| describe(*i))
                .collect(),
            review: workout
                .review_entries()
                .into_iter()
                .filter_map(describe)
                .collect(),
            replay: workout.replay().is_some(),
        }
    }

    /// "exercise 2 of 5"
    pub fn exercise_label(&self) -> String {
        format!(
            "exercise {} of {}",
            (self.exercise_index + 1).min(self.exercise_count),
            self.exercise_count
        )
    }

    /// "set 1 of 3"
    pub fn set_label(&self) -> String {
        format!("set {} of {}", self.set_index + 1, self.set_count.max(1))
    }
}

impl Workout {
    pub fn view(&self, now: DateTime<Utc>) -> WorkoutView {
        WorkoutView::of(self, now)
    }
}
