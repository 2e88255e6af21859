// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostics go to a file so the interactive terminal stays readable

use crate::state::{StateDir, LOG_FILE};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directives are read from this variable, e.g. `GW_LOG=gw_engine=debug`
pub const LOG_ENV: &str = "GW_LOG";

/// Keep the returned guard alive for the life of the process so buffered
/// lines are flushed on exit
pub fn setup(state: &StateDir) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(state.root())?;

    let file_appender = tracing_appender::rolling::never(state.root(), LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
