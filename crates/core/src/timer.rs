// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock anchored countdown
//!
//! A running countdown stores only its absolute end time. Remaining time is
//! always derived from `end - now`, so any amount of time spent suspended is
//! accounted for on the next evaluation. Expiry is reported exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which engine phase a countdown belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountdownKind {
    GetReady,
    Active,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running { end_at: DateTime<Utc> },
    Paused { remaining_ms: i64 },
    Expired,
}

/// Result of starting a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Started {
    /// Counting down (or holding, if started paused)
    Pending,
    /// Zero-length; treat as already complete, nothing was started
    Immediate,
}

/// Result of evaluating a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running { remaining: u32 },
    Paused { remaining: u32 },
    /// Reached zero on this evaluation
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    kind: Option<CountdownKind>,
    duration_secs: u32,
    state: CountdownState,
    generation: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            kind: None,
            duration_secs: 0,
            state: CountdownState::Idle,
            generation: 0,
        }
    }

    /// Replace whatever was live with a new countdown
    pub fn start(
        &mut self,
        kind: CountdownKind,
        duration_secs: u32,
        now: DateTime<Utc>,
        paused: bool,
    ) -> Started {
        self.generation += 1;
        self.kind = Some(kind);
        self.duration_secs = duration_secs;
        if duration_secs == 0 {
            self.state = CountdownState::Idle;
            return Started::Immediate;
        }
        let ms = duration_secs as i64 * 1000;
        self.state = if paused {
            CountdownState::Paused { remaining_ms: ms }
        } else {
            CountdownState::Running {
                end_at: now + chrono::Duration::milliseconds(ms),
            }
        };
        Started::Pending
    }

    pub fn cancel(&mut self) {
        if self.state != CountdownState::Idle {
            self.generation += 1;
        }
        self.kind = None;
        self.state = CountdownState::Idle;
    }

    /// Re-evaluate against the clock
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        match self.state {
            CountdownState::Running { end_at } => {
                let remaining = ceil_secs((end_at - now).num_milliseconds());
                if remaining <= 0 {
                    self.state = CountdownState::Expired;
                    Tick::Expired
                } else {
                    Tick::Running {
                        remaining: remaining as u32,
                    }
                }
            }
            CountdownState::Paused { remaining_ms } => Tick::Paused {
                remaining: ceil_secs(remaining_ms).max(0) as u32,
            },
            CountdownState::Idle | CountdownState::Expired => Tick::Idle,
        }
    }

    /// Capture what is left and drop the end timestamp; no-op unless running
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        let CountdownState::Running { end_at } = self.state else {
            return false;
        };
        let remaining_ms = (end_at - now).num_milliseconds().max(0);
        self.state = CountdownState::Paused { remaining_ms };
        true
    }

    /// Anchor a fresh end timestamp from the captured remainder; no-op
    /// unless paused
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        let CountdownState::Paused { remaining_ms } = self.state else {
            return false;
        };
        self.state = CountdownState::Running {
            end_at: now + chrono::Duration::milliseconds(remaining_ms),
        };
        true
    }

    /// Whole seconds left, without changing state
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<u32> {
        match self.state {
            CountdownState::Running { end_at } => {
                Some(ceil_secs((end_at - now).num_milliseconds()).max(0) as u32)
            }
            CountdownState::Paused { remaining_ms } => Some(ceil_secs(remaining_ms).max(0) as u32),
            CountdownState::Idle | CountdownState::Expired => None,
        }
    }

    pub fn kind(&self) -> Option<CountdownKind> {
        self.kind
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    /// Bumped every time a countdown is started or cancelled
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    /// Running or paused: something a ticker may need to drive
    pub fn is_live(&self) -> bool {
        matches!(
            self.state,
            CountdownState::Running { .. } | CountdownState::Paused { .. }
        )
    }
}

fn ceil_secs(ms: i64) -> i64 {
    if ms <= 0 {
        // Integer division truncates toward zero, which is the ceiling here
        ms / 1000
    } else {
        (ms + 999) / 1000
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
