// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! On-disk storage for the guided workout engine
//!
//! - [`Journal`]: append-only log of performed sets and workout log records,
//!   which is also where exercise history is read back from
//! - [`ResumeStore`]: one resume snapshot per workout, replaced atomically

mod journal;
mod resume_store;

pub use journal::{history, Journal, JournalEntry, JournalError, Record};
pub use resume_store::{ResumeStore, StoreError};
