// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw run <plan>` - Walk through a workout plan interactively

use crate::console::{self, Input};
use crate::error::GwError;
use crate::state::StateDir;
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use gw_adapters::{
    HistoryAdapter, JournalHistoryAdapter, JournalLogAdapter, LogAdapter, NoOpHistoryAdapter,
    NoOpLogAdapter, TracedHistoryAdapter, TracedLogAdapter,
};
use gw_core::{
    EngineConfig, Event, Exercise, Phase, SystemClock, UuidIdGen, WeightUnit, Workout,
    WorkoutEvent, WorkoutPlan, WorkoutView,
};
use gw_engine::{Runtime, RuntimeDeps};
use gw_storage::{Journal, ResumeStore};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, watch};

/// How long a suspend request gets to save progress before the process stops
#[cfg(unix)]
const SUSPEND_GRACE: std::time::Duration = std::time::Duration::from_millis(100);

#[derive(Args)]
pub struct RunArgs {
    /// Workout plan (TOML)
    pub plan: PathBuf,

    /// Start from the beginning, discarding saved progress
    #[arg(long)]
    pub fresh: bool,

    /// Do not record performed sets in the journal
    #[arg(long)]
    pub no_log: bool,

    /// Do not look up history for progression advice
    #[arg(long)]
    pub no_advice: bool,
}

pub async fn run(args: RunArgs, state: &StateDir, config: EngineConfig) -> Result<()> {
    let (name, exercises) = load_plan(&args.plan, &config)?;
    let store = ResumeStore::new(state.snapshots_dir());
    let mut workout = Workout::new(name.clone(), exercises, config.clone());

    if args.fresh {
        store.clear(&name)?;
    } else if let Some(snapshot) = store.load_valid(
        &name,
        workout.session().len(),
        Utc::now(),
        config.snapshot_ttl,
    ) {
        println!(
            "Resuming {} at {} (exercise {}, set {})",
            name,
            snapshot.exercise_name,
            snapshot.exercise_index + 1,
            snapshot.set_index + 1
        );
        workout = workout.restore(&snapshot);
    }

    if args.no_advice {
        with_log(workout, NoOpHistoryAdapter::new(), store, args.no_log, state).await
    } else {
        let history = TracedHistoryAdapter::new(JournalHistoryAdapter::new(state.journal_path()));
        with_log(workout, history, store, args.no_log, state).await
    }
}

async fn with_log<H: HistoryAdapter>(
    workout: Workout,
    history: H,
    store: ResumeStore,
    no_log: bool,
    state: &StateDir,
) -> Result<()> {
    if no_log {
        let log = TracedLogAdapter::new(NoOpLogAdapter::new());
        drive(workout, RuntimeDeps { history, log, store }).await
    } else {
        let journal = Journal::open(&state.journal_path())?;
        let log = TracedLogAdapter::new(JournalLogAdapter::new(
            journal,
            SystemClock,
            UuidIdGen,
            workout.config().client_id.clone(),
        ));
        drive(workout, RuntimeDeps { history, log, store }).await
    }
}

/// The plan's name (or its file stem) and its resolved exercises
pub fn load_plan(path: &Path, config: &EngineConfig) -> Result<(String, Vec<Exercise>), GwError> {
    let plan = WorkoutPlan::load(path).map_err(|e| GwError::plan_invalid(path, e))?;
    let exercises = plan
        .resolve(config)
        .map_err(|e| GwError::plan_invalid(path, e))?;
    let name = match plan.name.trim() {
        "" => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workout".to_string()),
        name => name.to_string(),
    };
    Ok((name, exercises))
}

async fn drive<H, L>(workout: Workout, deps: RuntimeDeps<H, L>) -> Result<()>
where
    H: HistoryAdapter,
    L: LogAdapter,
{
    let exercises = workout.session().exercises().to_vec();
    let unit = workout.config().progression.unit;

    let runtime = Runtime::new(workout, deps, SystemClock);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (views_tx, views_rx) = watch::channel(runtime.view());
    let runtime = runtime.with_observer(events_tx).with_views(views_tx);

    let (commands_tx, commands_rx) = mpsc::channel(32);
    commands_tx.send(WorkoutEvent::Start).await?;

    println!("Type 'help' for commands.");
    let printer = tokio::spawn(print_events(events_rx, views_rx.clone(), exercises, unit));
    let input = tokio::spawn(read_input(commands_tx.clone(), views_rx));
    #[cfg(unix)]
    let signals = tokio::spawn(forward_signals(commands_tx));
    #[cfg(not(unix))]
    drop(commands_tx);

    let finished = runtime.run(commands_rx).await;
    input.abort();
    #[cfg(unix)]
    signals.abort();
    // The observer closes with the runtime, which lets the printer drain
    printer.await?;

    let workout = finished?;
    tracing::info!(
        workout = workout.name(),
        phase = %workout.phase(),
        closed = workout.is_closed(),
        "session ended"
    );
    Ok(())
}

/// Print events as they happen, and recommendations once they arrive
async fn print_events(
    mut events: mpsc::UnboundedReceiver<Event>,
    mut views: watch::Receiver<WorkoutView>,
    exercises: Vec<Exercise>,
    unit: WeightUnit,
) {
    let mut shown_for = None;
    let mut views_open = true;
    loop {
        // Views first, so the last one is not lost when both channels close
        tokio::select! {
            biased;
            changed = views.changed(), if views_open => {
                if changed.is_err() {
                    views_open = false;
                    continue;
                }
                let view = views.borrow_and_update().clone();
                if view.phase == Phase::Complete || shown_for == Some(view.exercise_index) {
                    continue;
                }
                if let Some(rec) = &view.recommendation {
                    println!("{}", console::describe_recommendation(rec, unit));
                    shown_for = Some(view.exercise_index);
                }
            }
            event = events.recv() => match event {
                Some(event) => {
                    if let Some(line) = console::describe(&event, &exercises, unit) {
                        println!("{}", line);
                    }
                }
                None => break,
            },
        }
    }
}

/// Turn stdin lines into commands; end of input closes the workout
async fn read_input(commands: mpsc::Sender<WorkoutEvent>, views: watch::Receiver<WorkoutView>) {
    let mut lines = spawn_stdin_reader();
    while let Some(line) = lines.recv().await {
        let command = match console::parse_line(&line) {
            Ok(Some(Input::Command(command))) => command,
            Ok(Some(Input::Status)) => {
                println!("{}", console::status(&views.borrow()));
                continue;
            }
            Ok(Some(Input::Help)) => {
                println!("{}", console::HELP);
                continue;
            }
            Ok(Some(Input::Quit)) => break,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        if commands.send(command).await.is_err() {
            return;
        }
    }
    let _ = commands.send(WorkoutEvent::Close).await;
}

/// A blocked stdin read must not hold up process exit, so it gets a plain
/// thread rather than a runtime task
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Interrupts close the workout; job control suspends and foregrounds it
#[cfg(unix)]
async fn forward_signals(commands: mpsc::Sender<WorkoutEvent>) -> std::io::Result<()> {
    use nix::sys::signal::{raise, Signal};
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut stop = signal(SignalKind::from_raw(Signal::SIGTSTP as i32))?;
    let mut cont = signal(SignalKind::from_raw(Signal::SIGCONT as i32))?;

    loop {
        let event = tokio::select! {
            _ = terminate.recv() => WorkoutEvent::Close,
            _ = interrupt.recv() => WorkoutEvent::Close,
            _ = stop.recv() => {
                if commands.send(WorkoutEvent::Suspend).await.is_err() {
                    return Ok(());
                }
                tokio::time::sleep(SUSPEND_GRACE).await;
                if let Err(e) = raise(Signal::SIGSTOP) {
                    tracing::warn!(error = %e, "failed to stop process");
                }
                continue;
            }
            _ = cont.recv() => WorkoutEvent::Foreground,
        };
        if commands.send(event).await.is_err() {
            return Ok(());
        }
    }
}
