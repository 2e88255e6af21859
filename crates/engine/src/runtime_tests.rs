// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime tests

use super::*;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use gw_adapters::{FakeHistoryAdapter, FakeLogAdapter, HistoryError, LogError};
use gw_core::{
    Effort, EngineConfig, Exercise, ExerciseId, ExerciseRef, FakeClock, HistorySession,
    HistorySet, SessionLogMeta, SetEntry, SetLog,
};
use std::time::Duration;
use tempfile::TempDir;

type TestRuntime = Runtime<FakeHistoryAdapter, FakeLogAdapter, FakeClock>;

struct Setup {
    dir: TempDir,
    runtime: TestRuntime,
    clock: FakeClock,
    history: FakeHistoryAdapter,
    log: FakeLogAdapter,
}

impl Setup {
    fn store(&self) -> ResumeStore {
        ResumeStore::new(self.dir.path())
    }

    /// Handle `event`, then let background adapter calls finish
    async fn send(&mut self, event: WorkoutEvent) -> Vec<Event> {
        let mut events = self.runtime.handle(event).unwrap();
        events.extend(self.runtime.settle().await);
        events
    }

    async fn wait(&mut self, secs: u64) -> Vec<Event> {
        self.clock.advance(Duration::from_secs(secs));
        self.send(WorkoutEvent::Tick).await
    }

    async fn done(&mut self) -> Vec<Event> {
        self.send(WorkoutEvent::MarkSetDone(SetEntry::reps(5)))
            .await
    }
}

fn config() -> EngineConfig {
    EngineConfig {
        tick_interval: Duration::from_millis(10),
        ..EngineConfig::default()
    }
}

fn leg_day() -> Vec<Exercise> {
    vec![
        Exercise::reps("squat", "Squat", 2, 5).with_rest(30),
        Exercise::timed("plank", "Plank", 1, 30),
    ]
}

fn setup_with(exercises: Vec<Exercise>) -> Setup {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2026, 4, 28, 8, 0, 0).unwrap());
    let history = FakeHistoryAdapter::new();
    let log = FakeLogAdapter::new();
    let runtime = Runtime::new(
        Workout::new("Leg Day", exercises, config()),
        RuntimeDeps {
            history: history.clone(),
            log: log.clone(),
            store: ResumeStore::new(dir.path()),
        },
        clock.clone(),
    );
    Setup {
        dir,
        runtime,
        clock,
        history,
        log,
    }
}

fn setup() -> Setup {
    setup_with(leg_day())
}

fn phase_changed(events: &[Event], phase: Phase) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::PhaseChanged { phase: p, .. } if *p == phase))
}

#[tokio::test]
async fn start_opens_log_and_arms_ticker() {
    let mut s = setup();

    let events = s.send(WorkoutEvent::Start).await;

    assert!(phase_changed(&events, Phase::GetReady));
    assert!(s.runtime.is_ticking());
    assert!(matches!(
        s.log.session_logs().as_slice(),
        [SessionLogMeta::Open { exercise_count: 2, .. }]
    ));
}

#[tokio::test]
async fn expired_get_ready_stops_ticker_for_rep_sets() {
    let mut s = setup();
    s.send(WorkoutEvent::Start).await;

    s.clock.advance(Duration::from_secs(4));
    s.send(WorkoutEvent::Tick).await;
    assert_eq!(s.runtime.view().remaining_secs, Some(6));

    let events = s.wait(6).await;
    assert!(phase_changed(&events, Phase::Active));
    // Rep sets wait for the user
    assert!(!s.runtime.is_ticking());
}

#[tokio::test]
async fn rest_rearms_ticker_and_returns_to_active() {
    let mut s = setup();
    s.send(WorkoutEvent::Start).await;
    s.wait(10).await;

    let events = s.done().await;
    assert!(phase_changed(&events, Phase::Rest));
    assert!(s.runtime.is_ticking());

    let events = s.wait(30).await;
    assert!(phase_changed(&events, Phase::Active));
    assert_eq!(s.runtime.workout().position().set, 1);
}

#[tokio::test]
async fn history_is_fed_back_as_recommendation() {
    let mut s = setup();
    s.history.set_history(
        "squat",
        vec![HistorySession::new(
            NaiveDate::from_ymd_opt(2026, 4, 21).unwrap(),
            vec![
                HistorySet::new(5, 100.0, Effort::Moderate),
                HistorySet::new(5, 100.0, Effort::Moderate),
            ],
        )],
    );

    let events = s.send(WorkoutEvent::Start).await;

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::RecommendationReady { exercise_index: 0 })));
    assert!(s.runtime.workout().recommendation(0).is_some());
    assert!(s.runtime.view().recommendation.is_some());
}

#[tokio::test]
async fn history_failure_leaves_flow_alone() {
    let mut s = setup();
    s.history.set_failing(true);

    let events = s.send(WorkoutEvent::Start).await;

    assert!(phase_changed(&events, Phase::GetReady));
    assert!(s.runtime.workout().recommendation(0).is_none());
}

#[tokio::test]
async fn failed_persist_is_retried_at_save_points() {
    let mut s = setup();
    // The write and its retry at the next get-ready both fail
    s.log.fail_next(2);
    s.send(WorkoutEvent::Start).await;
    s.wait(10).await;
    s.done().await;
    s.wait(30).await;
    s.done().await;

    assert_eq!(s.runtime.pending_writes(), 1);
    // The transition went ahead regardless
    assert_eq!(s.runtime.workout().phase(), Phase::Rest);
    assert_eq!(s.runtime.workout().position().exercise, 1);

    s.wait(30).await;
    assert_eq!(s.runtime.workout().phase(), Phase::GetReady);
    assert_eq!(s.runtime.pending_writes(), 1);

    s.send(WorkoutEvent::Suspend).await;

    assert_eq!(s.runtime.pending_writes(), 0);
    assert_eq!(s.log.persisted(), vec!["squat", "squat", "squat"]);
    assert!(s.store().load("Leg Day").unwrap().is_some());
}

#[tokio::test]
async fn close_saves_snapshot_and_closes_log() {
    let mut s = setup();
    s.send(WorkoutEvent::Start).await;
    s.wait(10).await;
    s.done().await;

    let events = s.send(WorkoutEvent::Close).await;

    assert!(events.contains(&Event::SessionClosed));
    assert!(!s.runtime.is_ticking());
    let snapshot = s.store().load("Leg Day").unwrap().unwrap();
    assert_eq!(snapshot.completed[0], vec![0]);
    assert!(matches!(
        s.log.session_logs().last(),
        Some(SessionLogMeta::Close { finished: false, .. })
    ));

    let again = s.runtime.handle(WorkoutEvent::Start);
    assert!(matches!(again, Err(RuntimeError::Closed)));
}

#[tokio::test]
async fn completion_clears_snapshot() {
    let mut s = setup_with(vec![Exercise::reps("push", "Push Up", 1, 10)]);
    s.send(WorkoutEvent::Start).await;
    s.send(WorkoutEvent::Suspend).await;
    assert!(s.store().load("Leg Day").unwrap().is_some());

    s.wait(10).await;
    let events = s.done().await;

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::WorkoutComplete { .. })));
    assert_eq!(s.runtime.workout().phase(), Phase::Complete);
    assert!(s.store().load("Leg Day").unwrap().is_none());
    assert!(matches!(
        s.log.session_logs().last(),
        Some(SessionLogMeta::Close { finished: true, .. })
    ));
}

#[tokio::test]
async fn foreground_after_long_suspend_fires_once() {
    let mut s = setup();
    s.send(WorkoutEvent::Start).await;
    s.send(WorkoutEvent::Suspend).await;

    s.clock.advance(Duration::from_secs(600));
    let events = s.send(WorkoutEvent::Foreground).await;

    let entered_active = events
        .iter()
        .filter(|e| matches!(e, Event::PhaseChanged { phase: Phase::Active, .. }))
        .count();
    assert_eq!(entered_active, 1);
}

async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<Event>,
    wanted: impl Fn(&Event) -> bool,
) -> bool {
    let found = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = rx.recv().await {
            if wanted(&event) {
                return true;
            }
        }
        false
    })
    .await;
    found == Ok(true)
}

async fn wait_for_phase(rx: &mut mpsc::UnboundedReceiver<Event>, phase: Phase) {
    let reached = wait_for(rx, |e| {
        matches!(e, Event::PhaseChanged { phase: p, .. } if *p == phase)
    })
    .await;
    assert!(reached, "never reached {}", phase);
}

#[tokio::test]
async fn run_loop_ticks_countdown_and_closes_when_senders_drop() {
    let s = setup();
    let clock = s.clock.clone();
    let (observer, mut events) = mpsc::unbounded_channel();
    let runtime = s.runtime.with_observer(observer);
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(runtime.run(rx));

    tx.send(WorkoutEvent::Start).await.unwrap();
    wait_for_phase(&mut events, Phase::GetReady).await;

    // Nothing but the ticker moves the workout on from here
    clock.advance(Duration::from_secs(11));
    wait_for_phase(&mut events, Phase::Active).await;

    drop(tx);
    let workout = handle.await.unwrap().unwrap();
    assert!(workout.is_closed());
}

#[tokio::test]
async fn run_loop_publishes_views() {
    let s = setup();
    let (views_tx, mut views) = watch::channel(s.runtime.view());
    let runtime = s.runtime.with_views(views_tx);
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(runtime.run(rx));
    tx.send(WorkoutEvent::Start).await.unwrap();

    let started = tokio::time::timeout(
        Duration::from_secs(5),
        views.wait_for(|view| view.phase == Phase::GetReady && view.remaining_secs.is_some()),
    )
    .await
    .map(|seen| seen.is_ok());
    assert!(matches!(started, Ok(true)));

    drop(tx);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn lookup_lands_between_commands_in_run_loop() {
    let s = setup();
    s.history.set_history(
        "squat",
        vec![HistorySession::new(
            NaiveDate::from_ymd_opt(2026, 4, 21).unwrap(),
            vec![HistorySet::new(5, 100.0, Effort::Easy)],
        )],
    );
    let (observer, mut events) = mpsc::unbounded_channel();
    let runtime = s.runtime.with_observer(observer);
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(runtime.run(rx));
    tx.send(WorkoutEvent::Start).await.unwrap();

    let ready = wait_for(&mut events, |e| {
        matches!(e, Event::RecommendationReady { exercise_index: 0 })
    })
    .await;
    assert!(ready);

    drop(tx);
    let workout = handle.await.unwrap().unwrap();
    assert!(workout.recommendation(0).is_some());
}

/// Adapters whose calls never finish
#[derive(Clone)]
struct Unresponsive;

#[async_trait]
impl LogAdapter for Unresponsive {
    async fn persist_set_logs(
        &self,
        _exercise_id: &ExerciseId,
        _name: &str,
        _logs: &[SetLog],
    ) -> Result<(), LogError> {
        std::future::pending().await
    }

    async fn session_log(&self, _meta: &SessionLogMeta) -> Result<(), LogError> {
        std::future::pending().await
    }
}

#[async_trait]
impl HistoryAdapter for Unresponsive {
    async fn lookup(
        &self,
        _client_id: Option<&str>,
        _exercise: &ExerciseRef,
        _limit: usize,
    ) -> Result<Vec<HistorySession>, HistoryError> {
        std::future::pending().await
    }
}

fn unresponsive_runtime(dir: &TempDir) -> Runtime<Unresponsive, Unresponsive, FakeClock> {
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2026, 4, 28, 8, 0, 0).unwrap());
    Runtime::new(
        Workout::new(
            "Arms",
            vec![
                Exercise::reps("curl", "Curl", 1, 10),
                Exercise::reps("row", "Row", 1, 10),
            ],
            config(),
        ),
        RuntimeDeps {
            history: Unresponsive,
            log: Unresponsive,
            store: ResumeStore::new(dir.path()),
        },
        clock,
    )
}

#[tokio::test]
async fn hung_adapters_do_not_hold_up_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let mut runtime = unresponsive_runtime(&dir);

    runtime.handle(WorkoutEvent::Start).unwrap();
    runtime.handle(WorkoutEvent::Skip).unwrap();
    let events = runtime
        .handle(WorkoutEvent::MarkSetDone(SetEntry::reps(10)))
        .unwrap();

    assert!(events.contains(&Event::ExerciseCompleted { exercise_index: 0 }));
    assert_eq!(runtime.workout().position().exercise, 1);
    // Session log, lookup and the curl write are all still out
    assert!(runtime.executor().in_flight() >= 3);
    assert_eq!(runtime.pending_writes(), 0);
}

#[tokio::test]
async fn run_loop_keeps_taking_commands_while_adapters_hang() {
    let dir = tempfile::tempdir().unwrap();
    let (observer, mut events) = mpsc::unbounded_channel();
    let runtime = unresponsive_runtime(&dir).with_observer(observer);
    let (tx, rx) = mpsc::channel(8);

    let handle = tokio::spawn(runtime.run(rx));
    tx.send(WorkoutEvent::Start).await.unwrap();
    wait_for_phase(&mut events, Phase::GetReady).await;
    tx.send(WorkoutEvent::Skip).await.unwrap();
    wait_for_phase(&mut events, Phase::Active).await;
    tx.send(WorkoutEvent::MarkSetDone(SetEntry::reps(10)))
        .await
        .unwrap();
    let finished = wait_for(&mut events, |e| {
        matches!(e, Event::ExerciseCompleted { exercise_index: 0 })
    })
    .await;
    assert!(finished);

    // Closing gives up on the hung calls instead of waiting forever
    drop(tx);
    let workout = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(workout.is_closed());
    assert!(workout.session().is_finished(0));
    assert!(ResumeStore::new(dir.path()).load("Arms").unwrap().is_some());
}
