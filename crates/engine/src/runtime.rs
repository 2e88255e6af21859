// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the guided workout engine
//!
//! The runtime is the only place that touches the clock, the ticker and
//! the adapters. Commands and ticks are posted as [`WorkoutEvent`]s; each
//! one produces a new [`Workout`] and a list of effects, which the
//! [`Executor`] runs in order. Adapter calls run in the background, so a
//! slow or hung collaborator never holds up a transition; history lookups
//! are fed back in as events when they land.

use crate::{error::RuntimeError, Executor, Ticker};
use gw_adapters::{HistoryAdapter, LogAdapter};
use gw_core::{Clock, Effect, Event, Phase, Workout, WorkoutEvent, WorkoutView};
use gw_storage::ResumeStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior};

/// How long closing waits for background writes and lookups
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Runtime adapter dependencies
pub struct RuntimeDeps<H, L> {
    pub history: H,
    pub log: L,
    pub store: ResumeStore,
}

/// Runtime that drives a single workout
pub struct Runtime<H, L, C: Clock> {
    workout: Workout,
    executor: Executor<H, L>,
    clock: C,
    ticker: Arc<Mutex<Ticker>>,
    views: Option<watch::Sender<WorkoutView>>,
}

impl<H, L, C> Runtime<H, L, C>
where
    H: HistoryAdapter,
    L: LogAdapter,
    C: Clock,
{
    /// Create a new runtime
    pub fn new(workout: Workout, deps: RuntimeDeps<H, L>, clock: C) -> Self {
        let ticker = Arc::new(Mutex::new(Ticker::new(workout.config().tick_interval)));
        let executor = Executor::new(
            deps,
            workout.name(),
            workout.config(),
            Arc::clone(&ticker),
        );
        Self {
            workout,
            executor,
            clock,
            ticker,
            views: None,
        }
    }

    /// Forward every emitted event to `observer`
    pub fn with_observer(mut self, observer: mpsc::UnboundedSender<Event>) -> Self {
        self.executor.set_observer(observer);
        self
    }

    /// Publish a fresh view after every event `run` handles
    pub fn with_views(mut self, views: watch::Sender<WorkoutView>) -> Self {
        self.views = Some(views);
        self
    }

    /// Handle an incoming event
    ///
    /// Returns the events the workout emitted. Adapter calls the effects
    /// start are left running; see [`Runtime::settle`].
    pub fn handle(&mut self, event: WorkoutEvent) -> Result<Vec<Event>, RuntimeError> {
        if self.workout.is_closed() {
            return Err(RuntimeError::Closed);
        }

        let (next, effects) = self.workout.transition(event, &self.clock);
        self.workout = next;

        let emitted = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Emit(event) => Some(event.clone()),
                _ => None,
            })
            .collect();

        let result = self.executor.execute_all(effects, &self.workout);

        // An expired countdown stops the ticker even when no new one started
        if !self.workout.countdown().is_live() {
            self.ticker_lock().disarm();
        }

        result?;
        Ok(emitted)
    }

    /// Wait for every background adapter call, feeding history back in
    ///
    /// Returns the events emitted by the fed-back history. Lookups that land
    /// after the workout closed are dropped.
    pub async fn settle(&mut self) -> Vec<Event> {
        let mut emitted = Vec::new();
        while let Some(event) = self.executor.next_feedback().await {
            if self.workout.is_closed() {
                continue;
            }
            match self.handle(event) {
                Ok(events) => emitted.extend(events),
                Err(e) => tracing::error!(error = %e, "error handling fed-back event"),
            }
        }
        emitted
    }

    /// Drive the workout from a command channel until it closes or completes
    ///
    /// Dropping every sender closes the workout.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<WorkoutEvent>,
    ) -> Result<Workout, RuntimeError> {
        let mut interval: Option<Interval> = None;
        let mut armed_generation = 0;
        self.publish_view();

        loop {
            let event = tokio::select! {
                command = commands.recv() => Some(command.unwrap_or(WorkoutEvent::Close)),
                _ = next_tick(&mut interval) => Some(WorkoutEvent::Tick),
                fed_back = self.executor.next_feedback(), if self.executor.in_flight() > 0 => {
                    fed_back
                }
            };
            let Some(event) = event else {
                continue;
            };

            if event == WorkoutEvent::Close {
                // Let lookups already underway land before the workout closes
                self.settle_within(SETTLE_TIMEOUT).await;
            }
            if let Err(e) = self.handle(event) {
                tracing::error!(error = %e, "error handling workout event");
            }
            self.publish_view();

            if self.workout.is_closed() || self.workout.phase() == Phase::Complete {
                break;
            }

            let (armed, generation, period) = {
                let ticker = self.ticker_lock();
                (ticker.is_armed(), ticker.generation(), ticker.interval())
            };
            if !armed {
                interval = None;
            } else if interval.is_none() || generation != armed_generation {
                let mut fresh = tokio::time::interval(period);
                fresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
                interval = Some(fresh);
            }
            armed_generation = generation;
        }

        self.ticker_lock().disarm();
        self.settle_within(SETTLE_TIMEOUT).await;
        tracing::info!(
            workout = self.workout.name(),
            phase = %self.workout.phase(),
            pending_writes = self.executor.pending_writes(),
            "workout finished"
        );
        // Anything still running is aborted with the executor
        Ok(self.workout)
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    /// Read-only state for observers
    pub fn view(&self) -> WorkoutView {
        self.workout.view(self.clock.now())
    }

    /// Whether the ticker is driving a live countdown
    pub fn is_ticking(&self) -> bool {
        self.ticker_lock().is_armed()
    }

    /// Number of set-log writes waiting for a retry
    pub fn pending_writes(&self) -> usize {
        self.executor.pending_writes()
    }

    pub fn executor(&self) -> &Executor<H, L> {
        &self.executor
    }

    async fn settle_within(&mut self, limit: Duration) {
        if tokio::time::timeout(limit, self.settle()).await.is_err() {
            tracing::warn!(
                in_flight = self.executor.in_flight(),
                "gave up waiting for background work"
            );
        }
        self.publish_view();
    }

    fn publish_view(&self) {
        if let Some(views) = &self.views {
            views.send_replace(self.view());
        }
    }

    fn ticker_lock(&self) -> std::sync::MutexGuard<'_, Ticker> {
        self.ticker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Wait for the next tick; never resolves while disarmed
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
