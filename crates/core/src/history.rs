// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exercise history as returned by the history lookup

use crate::exercise::Effort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySet {
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub effort: Effort,
}

impl HistorySet {
    pub fn new(reps: u32, weight: f64, effort: Effort) -> Self {
        Self {
            reps,
            weight,
            effort,
        }
    }

    pub fn volume(&self) -> f64 {
        self.reps as f64 * self.weight
    }
}

/// One past performance of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySession {
    pub date: NaiveDate,
    #[serde(default)]
    pub sets: Vec<HistorySet>,
}

impl HistorySession {
    pub fn new(date: NaiveDate, sets: Vec<HistorySet>) -> Self {
        Self { date, sets }
    }

    pub fn max_weight(&self) -> f64 {
        self.sets.iter().map(|s| s.weight).fold(0.0, f64::max)
    }

    pub fn max_reps(&self) -> u32 {
        self.sets.iter().map(|s| s.reps).max().unwrap_or(0)
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(HistorySet::volume).sum()
    }

    /// A session counts toward progression only if something was lifted
    pub fn is_qualifying(&self) -> bool {
        self.sets.iter().any(|s| s.reps > 0)
    }
}

/// Which exercise to look history up for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseRef {
    Id(String),
    Name(String),
}

/// Summary over an exercise's history (most recent first)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub all_time_max_weight: f64,
    pub recent_max_weight: f64,
    pub total_workouts: usize,
    pub total_volume: f64,
    pub average_volume: f64,
    /// Sessions whose max weight beat every older session
    pub pr_count: usize,
}

impl HistoryStats {
    /// `None` when no session has a positive weight
    pub fn from_sessions(sessions: &[HistorySession]) -> Option<Self> {
        let max_weights: Vec<f64> = sessions
            .iter()
            .map(HistorySession::max_weight)
            .filter(|w| *w > 0.0)
            .collect();
        let recent_max_weight = *max_weights.first()?;
        let all_time_max_weight = max_weights.iter().copied().fold(0.0, f64::max);

        let volumes: Vec<f64> = sessions
            .iter()
            .map(HistorySession::volume)
            .filter(|v| *v > 0.0)
            .collect();
        let total_volume: f64 = volumes.iter().sum();
        let average_volume = if volumes.is_empty() {
            0.0
        } else {
            (total_volume / volumes.len() as f64).round()
        };

        // Walk oldest to newest so "beat every older session" is a running max
        let mut best = 0.0;
        let mut pr_count = 0;
        for session in sessions.iter().rev() {
            let weight = session.max_weight();
            if weight > best {
                if best > 0.0 {
                    pr_count += 1;
                }
                best = weight;
            }
        }

        Some(Self {
            all_time_max_weight,
            recent_max_weight,
            total_workouts: sessions.len(),
            total_volume,
            average_volume,
            pr_count,
        })
    }
}
