// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for state machine orchestration

use crate::exercise::{ExerciseId, SetLog};
use crate::resume::ResumeSnapshot;
use crate::timer::CountdownKind;
use crate::workout::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An operation the executor runs inside a span
///
/// `name` becomes the span's `effect` field; `fields` are logged when the
/// effect starts executing.
pub trait TracedEffect {
    fn name(&self) -> &'static str;
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Effects are side effects that the workout state machine requests
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit an event for observers
    Emit(Event),
    /// A countdown was (re)started; the ticker should be driving it
    StartCountdown {
        kind: CountdownKind,
        secs: u32,
        paused: bool,
    },
    /// The live countdown is gone; stop ticking
    CancelCountdown,
    /// Best-effort write of an exercise's performed sets
    PersistSetLogs {
        exercise_id: ExerciseId,
        logs: Vec<SetLog>,
    },
    /// Fetch history for the progression advisor
    LookupHistory {
        exercise_id: ExerciseId,
        name: String,
    },
    SaveSnapshot(Box<ResumeSnapshot>),
    ClearSnapshot,
    /// Open or close the workout log record
    SessionLog(SessionLogMeta),
    /// Retry any persistence that failed earlier
    FlushPending,
}

impl TracedEffect for Effect {
    fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::StartCountdown { .. } => "start_countdown",
            Effect::CancelCountdown => "cancel_countdown",
            Effect::PersistSetLogs { .. } => "persist_set_logs",
            Effect::LookupHistory { .. } => "lookup_history",
            Effect::SaveSnapshot(_) => "save_snapshot",
            Effect::ClearSnapshot => "clear_snapshot",
            Effect::SessionLog(_) => "session_log",
            Effect::FlushPending => "flush_pending",
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Emit(event) => vec![("event", event.name().to_string())],
            Effect::StartCountdown { kind, secs, paused } => vec![
                ("kind", format!("{:?}", kind)),
                ("secs", secs.to_string()),
                ("paused", paused.to_string()),
            ],
            Effect::CancelCountdown | Effect::ClearSnapshot | Effect::FlushPending => vec![],
            Effect::PersistSetLogs { exercise_id, logs } => vec![
                ("exercise_id", exercise_id.to_string()),
                ("sets", logs.len().to_string()),
            ],
            Effect::LookupHistory { exercise_id, name } => vec![
                ("exercise_id", exercise_id.to_string()),
                ("name", name.clone()),
            ],
            Effect::SaveSnapshot(snapshot) => vec![
                ("exercise_index", snapshot.exercise_index.to_string()),
                ("set_index", snapshot.set_index.to_string()),
            ],
            Effect::SessionLog(meta) => match meta {
                SessionLogMeta::Open {
                    workout,
                    exercise_count,
                    ..
                } => vec![
                    ("action", "open".to_string()),
                    ("workout", workout.clone()),
                    ("exercise_count", exercise_count.to_string()),
                ],
                SessionLogMeta::Close {
                    workout,
                    completed_exercises,
                    elapsed_secs,
                    finished,
                } => vec![
                    ("action", "close".to_string()),
                    ("workout", workout.clone()),
                    ("completed_exercises", completed_exercises.to_string()),
                    ("elapsed_secs", elapsed_secs.to_string()),
                    ("finished", finished.to_string()),
                ],
            },
        }
    }
}

/// Workout log record metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionLogMeta {
    Open {
        workout: String,
        exercise_count: usize,
        started_at: DateTime<Utc>,
    },
    Close {
        workout: String,
        completed_exercises: usize,
        elapsed_secs: u64,
        finished: bool,
    },
}

/// Events emitted by the workout state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseChanged {
        phase: Phase,
        exercise_index: usize,
        set_index: usize,
    },
    SetCompleted {
        exercise_index: usize,
        set_index: usize,
    },
    ExerciseCompleted {
        exercise_index: usize,
    },
    ExerciseSkipped {
        exercise_index: usize,
    },
    /// Every member of a superset completed together
    GroupCompleted {
        members: Vec<usize>,
    },
    ExerciseDeferred {
        exercise_index: usize,
    },
    DeferredResolved {
        exercise_index: usize,
        skipped: bool,
    },
    RecommendationReady {
        exercise_index: usize,
    },
    Paused,
    Resumed,
    WorkoutComplete {
        elapsed_secs: u64,
    },
    WorkoutUnavailable,
    SessionClosed,
}

impl Event {
    /// Get the event name for pattern matching
    /// Format: "category:action"
    pub fn name(&self) -> &'static str {
        match self {
            Event::PhaseChanged { .. } => "phase:changed",
            Event::SetCompleted { .. } => "set:completed",
            Event::ExerciseCompleted { .. } => "exercise:completed",
            Event::ExerciseSkipped { .. } => "exercise:skipped",
            Event::GroupCompleted { .. } => "group:completed",
            Event::ExerciseDeferred { .. } => "deferral:added",
            Event::DeferredResolved { .. } => "deferral:resolved",
            Event::RecommendationReady { .. } => "recommendation:ready",
            Event::Paused => "workout:paused",
            Event::Resumed => "workout:resumed",
            Event::WorkoutComplete { .. } => "workout:complete",
            Event::WorkoutUnavailable => "workout:unavailable",
            Event::SessionClosed => "workout:closed",
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
