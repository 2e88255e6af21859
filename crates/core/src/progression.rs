// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progressive-overload recommendations
//!
//! Turns the recent history of one exercise into a sets/reps/weight
//! prescription for today. Pure: the caller supplies history (most recent
//! first) and the current date, nothing is read or written.
//!
//! The effort thresholds and plateau comparison window are product
//! behavior and must be kept exactly as they are.

use crate::config::ProgressionConfig;
use crate::exercise::Effort;
use crate::history::{HistorySession, HistorySet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Most recent sessions considered
pub const MAX_HISTORY: usize = 5;

/// Sessions used for the 1RM plateau check
pub const PLATEAU_WINDOW: usize = 4;

/// Latest 1RM at or below this ratio of the comparison session is a plateau
pub const PLATEAU_RATIO: f64 = 1.02;

/// Weighting of the final set in the effort average
pub const LAST_SET_WEIGHT: f64 = 1.5;

/// At this many sets a plateau deloads instead of adding volume
pub const DELOAD_SET_THRESHOLD: u32 = 5;

pub const DELOAD_FACTOR: f64 = 0.9;

/// Name fragments that mark a multi-joint movement
pub const COMPOUND_KEYWORDS: &[&str] = &[
    "press", "squat", "deadlift", "row", "pull up", "pullup", "chin up", "lunge", "dip", "clean",
    "snatch", "thrust", "pulldown",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub reasoning: String,
    pub plateau: bool,
}

/// What the advisor needs to know about one exercise
#[derive(Debug, Clone)]
pub struct ProgressionInput<'a> {
    pub name: &'a str,
    pub compound: Option<bool>,
    pub prescribed_reps: u32,
    /// Most recent first
    pub history: &'a [HistorySession],
    /// Sessions on this date are excluded
    pub today: Option<NaiveDate>,
}

/// Target rep window around the prescription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepRange {
    pub bottom: u32,
    pub target: u32,
    pub top: u32,
}

impl RepRange {
    pub fn around(prescribed: u32) -> Self {
        Self {
            bottom: prescribed.saturating_sub(2).max(1),
            target: prescribed.max(1),
            top: prescribed + 2,
        }
    }
}

/// Estimated one-rep max (Brzycki)
pub fn brzycki(weight: f64, reps: u32) -> f64 {
    match reps {
        0 => 0.0,
        1 => weight,
        n => weight * 36.0 / (37.0 - n.min(36) as f64),
    }
}

/// Best estimated 1RM over a session's loaded sets
pub fn session_one_rep_max(session: &HistorySession) -> f64 {
    session
        .sets
        .iter()
        .filter(|s| s.weight > 0.0 && s.reps > 0)
        .map(|s| brzycki(s.weight, s.reps))
        .fold(0.0, f64::max)
}

/// Weighted RIR average over labeled sets, bucketed back into an effort
///
/// The final set of the session counts 1.5x. `None` when nothing is labeled.
pub fn effort_signal(sets: &[HistorySet]) -> Option<Effort> {
    let last = sets.len().checked_sub(1)?;
    let mut total = 0.0;
    let mut weights = 0.0;
    for (i, set) in sets.iter().enumerate() {
        let Some(rir) = set.effort.rir() else {
            continue;
        };
        let w = if i == last { LAST_SET_WEIGHT } else { 1.0 };
        total += rir * w;
        weights += w;
    }
    if weights == 0.0 {
        return None;
    }
    Some(Effort::from_rir(total / weights))
}

pub fn is_compound(name: &str, explicit: Option<bool>) -> bool {
    if let Some(compound) = explicit {
        return compound;
    }
    let name = name.to_lowercase();
    COMPOUND_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Estimated 1RMs of up to [`PLATEAU_WINDOW`] sessions, most recent first
pub fn plateau_series(sessions: &[HistorySession]) -> Vec<f64> {
    sessions
        .iter()
        .take(PLATEAU_WINDOW)
        .map(session_one_rep_max)
        .collect()
}

/// Latest 1RM compared with two sessions back (three or more sessions) or
/// the previous session (exactly two)
pub fn is_plateau(one_rep_maxes: &[f64]) -> bool {
    let comparison = match one_rep_maxes.len() {
        0 | 1 => return false,
        2 => one_rep_maxes[1],
        _ => one_rep_maxes[2],
    };
    comparison > 0.0 && one_rep_maxes[0] <= comparison * PLATEAU_RATIO
}

/// Recommend today's prescription, or `None` without qualifying history
pub fn recommend(input: &ProgressionInput<'_>, config: &ProgressionConfig) -> Option<Recommendation> {
    let sessions: Vec<HistorySession> = input
        .history
        .iter()
        .filter(|s| Some(s.date) != input.today && s.is_qualifying())
        .take(MAX_HISTORY)
        .cloned()
        .collect();
    let latest = sessions.first()?;

    let last_weight = latest.max_weight();
    let last_reps = latest.max_reps();
    let last_sets = (latest.sets.len() as u32).max(1);

    let effort = effort_signal(&latest.sets);
    let compound = is_compound(input.name, input.compound);
    let increment = if compound {
        config.compound_increment
    } else {
        config.isolation_increment
    };
    let range = RepRange::around(input.prescribed_reps);
    let series = plateau_series(&sessions);
    let plateau = is_plateau(&series);

    let unit = config.unit;
    let w = fmt_weight;
    let effort_label = match effort {
        Some(effort) => format!("{} effort", effort),
        None => "no effort logged".to_string(),
    };

    let rec = if plateau {
        let comparison = if series.len() >= 3 { series[2] } else { series[1] };
        if last_sets < DELOAD_SET_THRESHOLD {
            Recommendation {
                sets: last_sets + 1,
                reps: last_reps,
                weight: last_weight,
                reasoning: format!(
                    "Estimated 1RM has stalled ({} vs {} {unit}). Add a set: {} x {} at {} {unit}.",
                    w(series[0]),
                    w(comparison),
                    last_sets + 1,
                    last_reps,
                    w(last_weight),
                ),
                plateau,
            }
        } else {
            let deload = round_weight(last_weight * DELOAD_FACTOR);
            Recommendation {
                sets: last_sets,
                reps: range.bottom,
                weight: deload,
                reasoning: format!(
                    "Estimated 1RM has stalled at {} sets ({} vs {} {unit}). Deload to 90% ({} {unit}) for {} reps and build back up.",
                    last_sets,
                    w(series[0]),
                    w(comparison),
                    w(deload),
                    range.bottom,
                ),
                plateau,
            }
        }
    } else if effort == Some(Effort::Maxed) {
        if last_reps <= range.bottom {
            let lighter = round_weight((last_weight - increment).max(0.0));
            let reps = last_reps + 2;
            Recommendation {
                sets: last_sets,
                reps,
                weight: lighter,
                reasoning: format!(
                    "Maxed out at {} reps with {} {unit}, at or below the {}-rep floor. Drop {} {unit} to {} {unit} and aim for {} reps.",
                    last_reps,
                    w(last_weight),
                    range.bottom,
                    w(increment),
                    w(lighter),
                    reps,
                ),
                plateau,
            }
        } else {
            Recommendation {
                sets: last_sets,
                reps: last_reps,
                weight: last_weight,
                reasoning: format!(
                    "Maxed out at {} reps with {} {unit}. Hold the weight and repeat {} reps.",
                    last_reps,
                    w(last_weight),
                    last_reps,
                ),
                plateau,
            }
        }
    } else if last_reps >= range.target {
        let heavier = round_weight(last_weight + increment);
        Recommendation {
            sets: last_sets,
            reps: range.bottom,
            weight: heavier,
            reasoning: format!(
                "Hit {} reps at {} {unit} ({}). Time to add {} {unit}: {} {unit} for {} reps, the bottom of the {}-{} range.",
                last_reps,
                w(last_weight),
                effort_label,
                w(increment),
                w(heavier),
                range.bottom,
                range.bottom,
                range.top,
            ),
            plateau,
        }
    } else {
        let step = if effort == Some(Effort::Easy) { 2 } else { 1 };
        let reps = (last_reps + step).min(range.top);
        Recommendation {
            sets: last_sets,
            reps,
            weight: last_weight,
            reasoning: format!(
                "{} reps at {} {unit} ({}). Keep the weight and go for {} reps (range tops out at {}).",
                last_reps,
                w(last_weight),
                effort_label,
                reps,
                range.top,
            ),
            plateau,
        }
    };

    tracing::debug!(
        exercise = input.name,
        sessions = sessions.len(),
        plateau,
        effort = ?effort,
        compound,
        sets = rec.sets,
        reps = rec.reps,
        weight = rec.weight,
        "progression recommendation"
    );

    Some(rec)
}

fn round_weight(weight: f64) -> f64 {
    (weight * 100.0).round() / 100.0
}

fn fmt_weight(weight: f64) -> String {
    let rounded = round_weight(weight);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
#[path = "progression_tests.rs"]
mod tests;
