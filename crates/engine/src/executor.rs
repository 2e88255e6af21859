// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::{RuntimeDeps, Ticker};
use gw_adapters::{HistoryAdapter, LogAdapter};
use gw_core::{
    Effect, EngineConfig, Event, ExerciseId, ExerciseRef, ResumeSnapshot, SessionLogMeta, SetLog,
    Workout, WorkoutEvent,
};
use gw_storage::ResumeStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("snapshot store error: {0}")]
    Store(#[from] gw_storage::StoreError),
}

/// A set-log write, in flight or waiting for the next save point
#[derive(Debug, Clone)]
struct PendingWrite {
    exercise_id: ExerciseId,
    name: String,
    logs: Vec<SetLog>,
    /// Only the latest write for an exercise is worth retrying
    seq: u64,
}

/// What a background task reports back
enum Completion {
    Written(PendingWrite),
    WriteFailed(PendingWrite, String),
    SessionLogged,
    SessionLogFailed(String),
    History(WorkoutEvent),
}

/// Executes effects using the configured adapters
///
/// Adapter calls never block the caller: writes, workout log records and
/// history lookups run as background tasks, and their outcomes come back
/// through [`Executor::next_feedback`]. Dropping the executor aborts
/// whatever is still running.
pub struct Executor<H, L> {
    history: H,
    log: L,
    store: ResumeStore,
    /// Snapshot key
    workout: String,
    client_id: Option<String>,
    history_limit: usize,
    ticker: Arc<Mutex<Ticker>>,
    pending: Vec<PendingWrite>,
    /// Latest write issued per exercise
    issued: HashMap<ExerciseId, u64>,
    next_seq: u64,
    tasks: JoinSet<Completion>,
    observer: Option<mpsc::UnboundedSender<Event>>,
}

impl<H, L> Executor<H, L>
where
    H: HistoryAdapter,
    L: LogAdapter,
{
    /// Create a new executor
    pub fn new(
        deps: RuntimeDeps<H, L>,
        workout: &str,
        config: &EngineConfig,
        ticker: Arc<Mutex<Ticker>>,
    ) -> Self {
        Self {
            history: deps.history,
            log: deps.log,
            store: deps.store,
            workout: workout.to_string(),
            client_id: config.client_id.clone(),
            history_limit: config.history_limit,
            ticker,
            pending: Vec::new(),
            issued: HashMap::new(),
            next_seq: 0,
            tasks: JoinSet::new(),
            observer: None,
        }
    }

    /// Forward emitted events to an observer
    pub fn set_observer(&mut self, observer: mpsc::UnboundedSender<Event>) {
        self.observer = Some(observer);
    }

    /// Execute a single effect with tracing
    pub fn execute(&mut self, effect: Effect, workout: &Workout) -> Result<(), ExecuteError> {
        use gw_core::TracedEffect;

        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::info!(fields = ?effect.fields(), "executing");

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect, workout);
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        }

        result
    }

    fn execute_inner(&mut self, effect: Effect, workout: &Workout) -> Result<(), ExecuteError> {
        match effect {
            Effect::Emit(event) => {
                tracing::info!(event = event.name(), "event");
                if let Some(observer) = &self.observer {
                    // A departed observer is not an error
                    let _ = observer.send(event);
                }
                Ok(())
            }

            Effect::StartCountdown { .. } => {
                self.ticker_lock().arm();
                Ok(())
            }

            Effect::CancelCountdown => {
                self.ticker_lock().disarm();
                Ok(())
            }

            Effect::PersistSetLogs { exercise_id, logs } => {
                let name = workout
                    .session()
                    .exercises()
                    .iter()
                    .find(|e| e.id == exercise_id)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| exercise_id.to_string());
                self.persist(exercise_id, name, logs);
                Ok(())
            }

            Effect::LookupHistory { exercise_id, name } => {
                self.spawn_lookup(exercise_id, name);
                Ok(())
            }

            Effect::SaveSnapshot(snapshot) => {
                // Every snapshot is a save point for queued writes
                self.flush_pending();
                self.save_snapshot(&snapshot)
            }

            Effect::ClearSnapshot => {
                self.store.clear(&self.workout)?;
                Ok(())
            }

            Effect::SessionLog(meta) => {
                self.spawn_session_log(meta);
                Ok(())
            }

            Effect::FlushPending => {
                self.flush_pending();
                Ok(())
            }
        }
    }

    /// Execute multiple effects in order
    ///
    /// A failed effect does not stop the ones after it; the first failure
    /// is returned once all have run.
    pub fn execute_all(
        &mut self,
        effects: Vec<Effect>,
        workout: &Workout,
    ) -> Result<(), ExecuteError> {
        let mut first_error = None;
        for effect in effects {
            if let Err(e) = self.execute(effect, workout) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Wait for background work until one task has an event to feed back
    ///
    /// Write outcomes are absorbed along the way. Returns `None` once
    /// nothing is left in flight. Cancel safe.
    pub async fn next_feedback(&mut self) -> Option<WorkoutEvent> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Completion::History(event)) => return Some(event),
                Ok(completion) => self.absorb(completion),
                Err(e) => tracing::warn!(error = %e, "background task did not finish"),
            }
        }
        None
    }

    /// Number of adapter calls still running
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Number of set-log writes waiting for a retry
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    pub fn store(&self) -> &ResumeStore {
        &self.store
    }

    fn persist(&mut self, exercise_id: ExerciseId, name: String, logs: Vec<SetLog>) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.issued.insert(exercise_id.clone(), seq);
        // The new write carries every performed set, superseding a queued one
        self.pending.retain(|p| p.exercise_id != exercise_id);
        self.spawn_write(PendingWrite {
            exercise_id,
            name,
            logs,
            seq,
        });
    }

    fn spawn_write(&mut self, write: PendingWrite) {
        let log = self.log.clone();
        self.tasks.spawn(
            async move {
                let result = log
                    .persist_set_logs(&write.exercise_id, &write.name, &write.logs)
                    .await;
                match result {
                    Ok(()) => Completion::Written(write),
                    Err(e) => Completion::WriteFailed(write, e.to_string()),
                }
            }
            .instrument(tracing::Span::current()),
        );
    }

    fn spawn_session_log(&mut self, meta: SessionLogMeta) {
        let log = self.log.clone();
        self.tasks.spawn(
            async move {
                match log.session_log(&meta).await {
                    Ok(()) => Completion::SessionLogged,
                    Err(e) => Completion::SessionLogFailed(e.to_string()),
                }
            }
            .instrument(tracing::Span::current()),
        );
    }

    fn spawn_lookup(&mut self, exercise_id: ExerciseId, name: String) {
        let history = self.history.clone();
        let client_id = self.client_id.clone();
        // One extra so that a session logged today can be dropped by the advisor
        let limit = self.history_limit + 1;
        self.tasks.spawn(
            async move {
                let event =
                    lookup_history(&history, client_id.as_deref(), exercise_id, name, limit).await;
                Completion::History(event)
            }
            .instrument(tracing::Span::current()),
        );
    }

    fn absorb(&mut self, completion: Completion) {
        match completion {
            Completion::Written(write) => {
                tracing::debug!(
                    exercise_id = %write.exercise_id,
                    sets = write.logs.len(),
                    "set logs written"
                );
            }
            Completion::WriteFailed(write, error) => {
                if self.issued.get(&write.exercise_id) == Some(&write.seq) {
                    tracing::warn!(
                        exercise_id = %write.exercise_id,
                        %error,
                        "set logs queued for retry"
                    );
                    self.pending.push(write);
                } else {
                    tracing::debug!(
                        exercise_id = %write.exercise_id,
                        %error,
                        "superseded write failed"
                    );
                }
            }
            Completion::SessionLogged => {}
            Completion::SessionLogFailed(error) => {
                tracing::warn!(%error, "workout log not recorded");
            }
            Completion::History(_) => {}
        }
    }

    fn flush_pending(&mut self) {
        let queued = std::mem::take(&mut self.pending);
        if queued.is_empty() {
            return;
        }
        tracing::info!(count = queued.len(), "retrying pending writes");
        for write in queued {
            self.spawn_write(write);
        }
    }

    fn save_snapshot(&self, snapshot: &ResumeSnapshot) -> Result<(), ExecuteError> {
        self.store.save(&self.workout, snapshot)?;
        Ok(())
    }

    fn ticker_lock(&self) -> MutexGuard<'_, Ticker> {
        self.ticker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Look up by id first, then by name
async fn lookup_history<H: HistoryAdapter>(
    history: &H,
    client_id: Option<&str>,
    exercise_id: ExerciseId,
    name: String,
    limit: usize,
) -> WorkoutEvent {
    let by_id = ExerciseRef::Id(exercise_id.to_string());
    let result = match history.lookup(client_id, &by_id, limit).await {
        Ok(sessions) if sessions.is_empty() => {
            history
                .lookup(client_id, &ExerciseRef::Name(name), limit)
                .await
        }
        other => other,
    };

    match result {
        Ok(history) => WorkoutEvent::HistoryLoaded {
            exercise_id,
            history,
        },
        Err(e) => WorkoutEvent::HistoryFailed {
            exercise_id,
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
