// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error carries what went wrong, why it might have happened, and
//! how to fix it.

use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct GwError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GwError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for GwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for GwError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl GwError {
    /// Error for a plan file that cannot be used.
    pub fn plan_invalid(path: &Path, reason: gw_core::PlanError) -> Self {
        GwError::new(format!("Cannot load plan '{}'", path.display()))
            .with_context(reason.to_string())
            .with_suggestion("Check the plan lists at least one [[exercises]] entry")
            .with_suggestion(format!("Preview the plan with: gw plan {}", path.display()))
            .with_source(reason)
    }

    /// Error for a config file that does not parse.
    pub fn config_invalid(path: &Path, reason: gw_core::ConfigError) -> Self {
        GwError::new(format!("Cannot read config '{}'", path.display()))
            .with_context(reason.to_string())
            .with_suggestion("Durations are humantime strings, e.g. get_ready = \"10s\"")
            .with_suggestion(format!("Move the file aside: mv {0} {0}.bak", path.display()))
            .with_source(reason)
    }

    /// Error for an exercise with nothing recorded.
    pub fn no_history(exercise: &str) -> Self {
        GwError::new(format!("No history for '{}'", exercise))
            .with_context("Nothing has been logged for this exercise yet")
            .with_context("Names are matched case-insensitively, ids exactly")
            .with_suggestion("Log a session first with: gw run <plan>")
    }

    /// Error for a workout without saved progress.
    pub fn snapshot_not_found(workout: &str) -> Self {
        GwError::new(format!("No saved progress for '{}'", workout))
            .with_context("The workout may have finished or the snapshot expired")
            .with_suggestion("List saved progress: gw resume list")
    }
}
