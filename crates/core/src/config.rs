// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty file (or no file)
//! yields the stock behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Unit weights are displayed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lb => write!(f, "lb"),
        }
    }
}

/// Progression increments, in whatever unit history is logged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub compound_increment: f64,
    pub isolation_increment: f64,
    pub unit: WeightUnit,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            compound_increment: 5.0,
            isolation_increment: 2.5,
            unit: WeightUnit::Kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(with = "humantime_serde")]
    pub get_ready: Duration,
    pub default_sets: u32,
    pub default_reps: u32,
    #[serde(with = "humantime_serde")]
    pub default_duration: Duration,
    #[serde(with = "humantime_serde")]
    pub default_rest: Duration,
    /// How often a live countdown is re-evaluated
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Resume snapshots at least this old are discarded
    #[serde(with = "humantime_serde")]
    pub snapshot_ttl: Duration,
    /// Number of past sessions fed to the progression advisor
    pub history_limit: usize,
    pub client_id: Option<String>,
    pub progression: ProgressionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            get_ready: Duration::from_secs(10),
            default_sets: 3,
            default_reps: 12,
            default_duration: Duration::from_secs(30),
            default_rest: Duration::from_secs(60),
            tick_interval: Duration::from_millis(250),
            snapshot_ttl: Duration::from_secs(12 * 60 * 60),
            history_limit: 5,
            client_id: None,
            progression: ProgressionConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn get_ready_secs(&self) -> u32 {
        self.get_ready.as_secs() as u32
    }
}
