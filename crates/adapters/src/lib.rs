// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the workout engine's external collaborators

pub mod history;
pub mod log;
pub mod traced;

pub use history::{HistoryAdapter, HistoryError, JournalHistoryAdapter, NoOpHistoryAdapter};
pub use log::{JournalLogAdapter, LogAdapter, LogError, NoOpLogAdapter};
pub use traced::{TracedHistoryAdapter, TracedLogAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use history::{FakeHistoryAdapter, HistoryCall};
#[cfg(any(test, feature = "test-support"))]
pub use log::{FakeLogAdapter, LogCall};
