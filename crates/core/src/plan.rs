// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workout plans as written by hand
//!
//! A plan entry may leave most of the prescription out, or write reps as
//! free text ("8-12", "10 reps"). Resolution fills the gaps from
//! [`EngineConfig`] and produces concrete [`Exercise`] values.

use crate::config::EngineConfig;
use crate::exercise::{Exercise, ExerciseId, TrackingKind, WorkoutPhase};
use crate::id::slugify;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid plan: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("plan has no exercises")]
    Empty,
    #[error("exercise {index} has no name")]
    MissingName { index: usize },
}

/// Reps as a number or as text with a leading number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepsField {
    Count(u32),
    Text(String),
}

impl RepsField {
    pub fn resolve(&self) -> Option<u32> {
        match self {
            RepsField::Count(n) => Some(*n),
            RepsField::Text(text) => parse_leading_int(text),
        }
    }
}

/// Leading integer of a string, e.g. `"8-12"` -> 8
pub fn parse_leading_int(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// A plan entry before defaults are applied
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<RepsField>,
    /// Seconds per set for time-tracked exercises
    #[serde(default)]
    pub duration: Option<u32>,
    /// Seconds of rest after each set
    #[serde(default)]
    pub rest: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub tracking: Option<TrackingKind>,
    #[serde(default)]
    pub phase: Option<WorkoutPhase>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub compound: Option<bool>,
}

impl ExerciseSpec {
    pub fn resolve(&self, index: usize, config: &EngineConfig) -> Result<Exercise, PlanError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PlanError::MissingName { index });
        }

        let tracking = self.tracking.unwrap_or(if self.duration.is_some() {
            TrackingKind::Time
        } else {
            TrackingKind::Reps
        });

        let reps = self
            .reps
            .as_ref()
            .and_then(RepsField::resolve)
            .unwrap_or(config.default_reps);

        let id = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}-{}", slugify(name), index + 1),
        };

        Ok(Exercise {
            id: ExerciseId(id),
            name: name.to_string(),
            sets: self.sets.unwrap_or(config.default_sets),
            reps,
            duration_secs: self
                .duration
                .unwrap_or(config.default_duration.as_secs() as u32),
            rest_secs: self.rest.unwrap_or(config.default_rest.as_secs() as u32),
            weight: self.weight,
            tracking,
            phase: self.phase.unwrap_or_default(),
            group: self
                .group
                .as_ref()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty()),
            compound: self.compound,
        })
    }
}

/// A named, ordered list of exercises
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseSpec>,
}

impl WorkoutPlan {
    pub fn from_toml(text: &str) -> Result<Self, PlanError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Apply defaults and validate every entry
    pub fn resolve(&self, config: &EngineConfig) -> Result<Vec<Exercise>, PlanError> {
        if self.exercises.is_empty() {
            return Err(PlanError::Empty);
        }
        self.exercises
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.resolve(i, config))
            .collect()
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
