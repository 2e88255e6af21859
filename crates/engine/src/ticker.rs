// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one ticker that drives the live countdown
//!
//! Ticks carry no time information. They only prompt the workout to
//! re-evaluate its countdown against the clock, so a late or dropped tick
//! cannot skew the remaining time.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    armed: bool,
    /// Bumped on every arm so the runtime can tell a restart from a no-op
    generation: u64,
}

impl Ticker {
    /// A zero interval is raised to one millisecond
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            armed: false,
            generation: 0,
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.generation += 1;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
