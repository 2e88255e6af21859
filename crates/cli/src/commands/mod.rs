// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod advise;
pub mod history;
pub mod plan;
pub mod resume;
pub mod run;
