// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-core: Core library for the guided workout (gw) engine
//!
//! This crate provides:
//! - The pure workout state machine (get-ready, active, rest, review)
//! - Superset round cycling and the deferred-exercise queue
//! - A wall-clock anchored countdown
//! - The progressive-overload advisor
//! - The resume snapshot type and effect-based orchestration

pub mod clock;
pub mod config;
pub mod id;

pub mod exercise;
pub mod history;
pub mod plan;
pub mod progression;

// State machines (order matters for dependencies)
pub mod timer;
pub mod superset;
pub mod deferral;
pub mod session;
pub mod resume;
pub mod effect;
pub mod workout;
pub mod view;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, EngineConfig, ProgressionConfig, WeightUnit};
pub use deferral::{Boundary, DeferralQueue};
pub use effect::{Effect, Event, SessionLogMeta, TracedEffect};
pub use exercise::{
    Effort, Exercise, ExerciseId, SetEntry, SetLog, TrackingKind, WorkoutPhase,
};
pub use history::{ExerciseRef, HistorySession, HistorySet, HistoryStats};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use plan::{PlanError, WorkoutPlan};
pub use progression::{recommend, ProgressionInput, Recommendation};
pub use resume::{Rejection, ResumeSnapshot};
pub use session::{Position, Session};
pub use superset::{SupersetCoordinator, SupersetGroup, SupersetState};
pub use timer::{Countdown, CountdownKind};
pub use view::WorkoutView;
pub use workout::{Phase, Workout, WorkoutEvent};
