// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exercise prescriptions and per-set logs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an exercise within a workout
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub String);

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExerciseId {
    fn from(s: String) -> Self {
        ExerciseId(s)
    }
}

impl From<&str> for ExerciseId {
    fn from(s: &str) -> Self {
        ExerciseId(s.to_string())
    }
}

/// How a set is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingKind {
    #[default]
    Reps,
    Time,
    Distance,
    Failure,
}

impl TrackingKind {
    /// Only time-tracked sets run an active-phase countdown; every other
    /// kind waits for an explicit "set done"
    pub fn is_timed(self) -> bool {
        matches!(self, TrackingKind::Time)
    }
}

/// Structural section of a workout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutPhase {
    Warmup,
    #[default]
    Main,
    Cooldown,
}

impl fmt::Display for WorkoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutPhase::Warmup => write!(f, "warmup"),
            WorkoutPhase::Main => write!(f, "main"),
            WorkoutPhase::Cooldown => write!(f, "cooldown"),
        }
    }
}

/// A prescribed exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub duration_secs: u32,
    pub rest_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default)]
    pub tracking: TrackingKind,
    #[serde(default)]
    pub phase: WorkoutPhase,
    /// Superset label; only honored for contiguous runs of two or more
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Explicit compound/isolation classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<bool>,
}

impl Exercise {
    /// A rep-tracked exercise with a 60 second rest
    pub fn reps(id: impl Into<ExerciseId>, name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sets,
            reps,
            duration_secs: 0,
            rest_secs: 60,
            weight: None,
            tracking: TrackingKind::Reps,
            phase: WorkoutPhase::Main,
            group: None,
            compound: None,
        }
    }

    /// A time-tracked exercise with a 60 second rest
    pub fn timed(
        id: impl Into<ExerciseId>,
        name: impl Into<String>,
        sets: u32,
        duration_secs: u32,
    ) -> Self {
        Self {
            duration_secs,
            tracking: TrackingKind::Time,
            ..Self::reps(id, name, sets, 0)
        }
    }

    pub fn with_rest(self, rest_secs: u32) -> Self {
        Self { rest_secs, ..self }
    }

    pub fn with_phase(self, phase: WorkoutPhase) -> Self {
        Self { phase, ..self }
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..self
        }
    }

    pub fn with_tracking(self, tracking: TrackingKind) -> Self {
        Self { tracking, ..self }
    }

    pub fn in_group(self, label: impl Into<String>) -> Self {
        Self {
            group: Some(label.into()),
            ..self
        }
    }

    pub fn with_compound(self, compound: bool) -> Self {
        Self {
            compound: Some(compound),
            ..self
        }
    }

    pub fn is_timed(&self) -> bool {
        self.tracking.is_timed()
    }

    /// Prescribed set count; an exercise always has at least one set
    pub fn set_count(&self) -> usize {
        self.sets.max(1) as usize
    }
}

/// Self-reported effort on a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Easy,
    Moderate,
    Hard,
    Maxed,
    #[default]
    None,
}

impl Effort {
    /// Reps-in-reserve value for a labeled effort
    pub fn rir(self) -> Option<f64> {
        match self {
            Effort::Easy => Some(4.0),
            Effort::Moderate => Some(2.5),
            Effort::Hard => Some(1.0),
            Effort::Maxed => Some(0.0),
            Effort::None => None,
        }
    }

    /// Bucket an averaged RIR back into a label
    pub fn from_rir(rir: f64) -> Effort {
        if rir >= 3.5 {
            Effort::Easy
        } else if rir >= 1.75 {
            Effort::Moderate
        } else if rir >= 0.5 {
            Effort::Hard
        } else {
            Effort::Maxed
        }
    }

    pub fn parse(s: &str) -> Option<Effort> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Effort::Easy),
            "moderate" | "medium" => Some(Effort::Moderate),
            "hard" => Some(Effort::Hard),
            "maxed" | "max" | "failure" => Some(Effort::Maxed),
            "none" | "" => Some(Effort::None),
            _ => None,
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effort::Easy => write!(f, "easy"),
            Effort::Moderate => write!(f, "moderate"),
            Effort::Hard => write!(f, "hard"),
            Effort::Maxed => write!(f, "maxed"),
            Effort::None => write!(f, "none"),
        }
    }
}

/// What was done on a single set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetLog {
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    pub rest_secs: u32,
    #[serde(default)]
    pub effort: Effort,
}

impl SetLog {
    /// Log pre-filled from the prescription, before the set is performed
    pub fn prescribed(exercise: &Exercise) -> Self {
        Self {
            reps: exercise.reps,
            weight: exercise.weight,
            duration_secs: exercise.is_timed().then_some(exercise.duration_secs),
            rest_secs: exercise.rest_secs,
            effort: Effort::None,
        }
    }
}

/// Values reported when a set is marked done
///
/// Unset fields keep the prescribed defaults already in the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetEntry {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub duration_secs: Option<u32>,
    pub effort: Option<Effort>,
}

impl SetEntry {
    pub fn reps(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..self
        }
    }

    pub fn with_effort(self, effort: Effort) -> Self {
        Self {
            effort: Some(effort),
            ..self
        }
    }

    /// Merge reported values into a log
    pub fn apply_to(&self, log: &mut SetLog) {
        if let Some(reps) = self.reps {
            log.reps = reps;
        }
        if let Some(weight) = self.weight {
            log.weight = Some(weight);
        }
        if let Some(duration) = self.duration_secs {
            log.duration_secs = Some(duration);
        }
        if let Some(effort) = self.effort {
            log.effort = effort;
        }
    }
}

#[cfg(test)]
#[path = "exercise_tests.rs"]
mod tests;
