// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where gw keeps its files
//!
//! ```text
//! <state-dir>/
//!   config.toml      engine settings (optional)
//!   journal.jsonl    every logged set and workout record
//!   snapshots/       one resume snapshot per workout
//!   gw.log           diagnostics
//! ```

use crate::error::GwError;
use gw_core::EngineConfig;
use std::path::{Path, PathBuf};

pub const LOG_FILE: &str = "gw.log";

#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Use the given directory, else the platform data directory
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, GwError> {
        let root = explicit
            .or_else(|| dirs::data_dir().map(|dir| dir.join("gw")))
            .ok_or_else(|| {
                GwError::new("Cannot determine where to keep workout data")
                    .with_context("No platform data directory is available")
                    .with_suggestion("Pass one explicitly: gw --state-dir <dir> ...")
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join("journal.jsonl")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    /// Engine settings; defaults when there is no config file
    pub fn load_config(&self) -> Result<EngineConfig, GwError> {
        let path = self.config_path();
        EngineConfig::load(&path).map_err(|e| GwError::config_invalid(&path, e))
    }
}
