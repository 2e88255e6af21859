// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guided workout state machine
//!
//! A [`Workout`] walks a [`Session`] through get-ready, active and rest
//! phases per exercise and set. It is the sole owner of the current
//! position. Superset cycling and deferral decisions are delegated to
//! [`SupersetCoordinator`] and [`DeferralQueue`]; every countdown goes
//! through the single [`Countdown`].
//!
//! Transitions are pure: `transition` returns the next workout and the
//! effects to execute. Commands that make no sense in the current phase
//! are ignored. Nothing here returns an error or panics.
//!
//! Timer expiry is not a callback. The runtime posts [`WorkoutEvent::Tick`]
//! (or [`WorkoutEvent::Foreground`] after a suspend) and the workout
//! re-evaluates its countdown against the clock.

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::deferral::{Boundary, DeferralQueue};
use crate::effect::{Effect, Event, SessionLogMeta};
use crate::exercise::{Exercise, ExerciseId, SetEntry};
use crate::history::HistorySession;
use crate::progression::{recommend, ProgressionInput, Recommendation};
use crate::resume::{ResumeSnapshot, SNAPSHOT_VERSION};
use crate::session::{Elapsed, Position, Session};
use crate::superset::{RoundStep, SupersetCoordinator, SupersetGroup, SupersetState};
use crate::timer::{Countdown, CountdownKind, Started, Tick};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Engine phase, distinct from an exercise's warmup/main/cooldown tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    GetReady,
    Active,
    Rest,
    DeferredReview,
    Complete,
    /// The exercise list is empty; only closing gets out of here
    Unavailable,
}

impl Phase {
    /// Phases in which an exercise is being played
    pub fn is_playing(self) -> bool {
        matches!(self, Phase::GetReady | Phase::Active | Phase::Rest)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::GetReady => "get-ready",
            Phase::Active => "active",
            Phase::Rest => "rest",
            Phase::DeferredReview => "deferred-review",
            Phase::Complete => "complete",
            Phase::Unavailable => "unavailable",
        };
        write!(f, "{}", s)
    }
}

/// Commands and signals fed into the workout
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutEvent {
    Start,
    Pause,
    Resume,
    MarkSetDone(SetEntry),
    Skip,
    /// Defer the current unit, or the unit containing the given index
    Defer {
        exercise_index: Option<usize>,
    },
    Back,
    SelectExercise(usize),
    DoItNow(usize),
    SkipForGood(usize),
    SkipAllDeferred,
    Tick,
    /// Host is about to be backgrounded
    Suspend,
    /// Host came back; arbitrary time may have passed
    Foreground,
    ExercisesChanged(Vec<Exercise>),
    HistoryLoaded {
        exercise_id: ExerciseId,
        history: Vec<HistorySession>,
    },
    HistoryFailed {
        exercise_id: ExerciseId,
        reason: String,
    },
    Close,
}

impl WorkoutEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkoutEvent::Start => "start",
            WorkoutEvent::Pause => "pause",
            WorkoutEvent::Resume => "resume",
            WorkoutEvent::MarkSetDone(_) => "mark_set_done",
            WorkoutEvent::Skip => "skip",
            WorkoutEvent::Defer { .. } => "defer",
            WorkoutEvent::Back => "back",
            WorkoutEvent::SelectExercise(_) => "select_exercise",
            WorkoutEvent::DoItNow(_) => "do_it_now",
            WorkoutEvent::SkipForGood(_) => "skip_for_good",
            WorkoutEvent::SkipAllDeferred => "skip_all_deferred",
            WorkoutEvent::Tick => "tick",
            WorkoutEvent::Suspend => "suspend",
            WorkoutEvent::Foreground => "foreground",
            WorkoutEvent::ExercisesChanged(_) => "exercises_changed",
            WorkoutEvent::HistoryLoaded { .. } => "history_loaded",
            WorkoutEvent::HistoryFailed { .. } => "history_failed",
            WorkoutEvent::Close => "close",
        }
    }
}

/// A pending deferred-review decision
#[derive(Debug, Clone, PartialEq, Eq)]
struct Review {
    boundary: Boundary,
    /// Where control was headed when the review interrupted it
    pending_next: Option<usize>,
}

/// What a rest leads into; the position already points at it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RestNext {
    /// Next set (or superset round) of the same unit, straight to active
    Set,
    /// A different unit, through get-ready
    Unit,
}

#[derive(Debug, Clone)]
pub struct Workout {
    name: String,
    config: EngineConfig,
    session: Session,
    phase: Phase,
    started: bool,
    closed: bool,
    paused: bool,
    countdown: Countdown,
    supersets: SupersetCoordinator,
    superset: Option<SupersetState>,
    deferred: DeferralQueue,
    review: Option<Review>,
    /// Deferred entry being played from the review
    replay: Option<usize>,
    rest_then: RestNext,
    recommendations: HashMap<ExerciseId, Recommendation>,
    history_requested: HashSet<ExerciseId>,
}

impl Workout {
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>, config: EngineConfig) -> Self {
        let supersets = SupersetCoordinator::new(&exercises);
        Self {
            name: name.into(),
            config,
            session: Session::new(exercises),
            phase: Phase::GetReady,
            started: false,
            closed: false,
            paused: false,
            countdown: Countdown::new(),
            supersets,
            superset: None,
            deferred: DeferralQueue::new(),
            review: None,
            replay: None,
            rest_then: RestNext::Set,
            recommendations: HashMap::new(),
            history_requested: HashSet::new(),
        }
    }

    /// Seed progress from an accepted snapshot; takes effect on `Start`
    ///
    /// Whatever phase was live when the snapshot was taken, the workout
    /// re-enters get-ready for the saved exercise and set.
    pub fn restore(mut self, snapshot: &ResumeSnapshot) -> Self {
        self.session
            .restore_progress(&snapshot.completed, &snapshot.finished, &snapshot.logs);
        self.session.position = Position::new(snapshot.exercise_index, snapshot.set_index);
        self.session.clamp_position();
        self.session.elapsed = Elapsed::with_base(snapshot.elapsed_secs);

        let len = self.session.len();
        let supersets = &self.supersets;
        self.deferred = DeferralQueue::from_entries(
            snapshot
                .deferred
                .iter()
                .copied()
                .filter(|i| *i < len)
                .map(|i| supersets.representative(i)),
        );
        let position = self.session.position;
        self.superset = snapshot.superset.clone().filter(|s| {
            s.exercise_index() == position.exercise
                && s.round == position.set
                && supersets.group_of(position.exercise).map(|g| g.start) == Some(s.group_start)
        });
        self.prune_deferred();
        tracing::debug!(
            exercise_index = position.exercise,
            set_index = position.set,
            deferred = self.deferred.len(),
            "restored from snapshot"
        );
        self
    }

    /// Apply one event
    pub fn transition(&self, event: WorkoutEvent, clock: &impl Clock) -> (Workout, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();
        next.apply(event, clock.now(), &mut effects);
        (next, effects)
    }

    fn apply(&mut self, event: WorkoutEvent, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let name = event.name();
        if self.closed {
            tracing::debug!(event = name, "workout closed, ignoring");
            return;
        }
        let handled = match event {
            WorkoutEvent::Start => self.start(now, fx),
            WorkoutEvent::Close => self.close(now, fx),
            WorkoutEvent::ExercisesChanged(exercises) => {
                self.exercises_changed(exercises, now, fx)
            }
            WorkoutEvent::HistoryLoaded {
                exercise_id,
                history,
            } => self.history_loaded(exercise_id, &history, now, fx),
            WorkoutEvent::HistoryFailed {
                exercise_id,
                reason,
            } => {
                tracing::debug!(%exercise_id, %reason, "history unavailable, no recommendation");
                true
            }
            _ if !self.started => false,
            WorkoutEvent::Pause => self.pause(now, fx),
            WorkoutEvent::Resume => self.resume(now, fx),
            WorkoutEvent::MarkSetDone(entry) => self.mark_set_done(&entry, now, fx),
            WorkoutEvent::Skip => self.skip(now, fx),
            WorkoutEvent::Defer { exercise_index } => self.defer(exercise_index, now, fx),
            WorkoutEvent::Back => self.back(now, fx),
            WorkoutEvent::SelectExercise(index) => self.select(index, now, fx),
            WorkoutEvent::DoItNow(index) => self.do_it_now(index, now, fx),
            WorkoutEvent::SkipForGood(index) => self.skip_for_good(index, now, fx),
            WorkoutEvent::SkipAllDeferred => self.skip_all_deferred(now, fx),
            WorkoutEvent::Tick | WorkoutEvent::Foreground => self.evaluate_countdown(now, fx),
            WorkoutEvent::Suspend => self.suspend(now, fx),
        };
        if !handled {
            tracing::debug!(event = name, phase = %self.phase, "ignored");
        }
    }

    // === Commands ===

    fn start(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.session.elapsed.start(now);
        fx.push(Effect::SessionLog(SessionLogMeta::Open {
            workout: self.name.clone(),
            exercise_count: self.session.len(),
            started_at: now,
        }));
        if self.session.is_empty() {
            self.enter_unavailable(fx);
            return true;
        }
        let position = self.session.position;
        self.enter_at(position, now, fx);
        true
    }

    fn pause(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.paused || !self.phase.is_playing() {
            return false;
        }
        self.paused = true;
        self.countdown.pause(now);
        fx.push(Effect::Emit(Event::Paused));
        true
    }

    fn resume(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.countdown.resume(now);
        fx.push(Effect::Emit(Event::Resumed));
        true
    }

    fn mark_set_done(&mut self, entry: &SetEntry, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.complete_current_set(Some(entry), now, fx);
        true
    }

    fn skip(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        match self.phase {
            Phase::GetReady => self.enter_active(now, fx),
            Phase::Rest => self.finish_rest(now, fx),
            Phase::Active => {
                let index = self.session.position.exercise;
                let end = *self.supersets.unit(index).end();
                self.cancel_countdown(fx);
                self.skip_unit(index, fx);
                self.advance_from(end, false, None, now, fx);
            }
            _ => return false,
        }
        true
    }

    fn defer(&mut self, target: Option<usize>, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        let current = self.session.position.exercise;
        let target = target.unwrap_or(current);
        if target >= self.session.len() {
            return false;
        }
        let rep = self.supersets.representative(target);
        if self.unit_finished(rep) {
            return false;
        }
        let unit = self.supersets.unit(rep);
        let here = unit.contains(&current);

        // Deferring the entry being replayed just puts it back on the list
        if here && self.replay == Some(rep) {
            if let Some(review) = self.review.clone() {
                self.enter_review(review, now, fx);
                return true;
            }
        }

        let added = self.deferred.defer(rep);
        if !added && !here {
            return false;
        }
        fx.push(Effect::Emit(Event::ExerciseDeferred {
            exercise_index: rep,
        }));
        if here {
            self.cancel_countdown(fx);
            self.advance_from(*unit.end(), false, Some(rep), now, fx);
        }
        true
    }

    fn back(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        if self.replay.is_some() {
            if let Some(review) = self.review.clone() {
                self.enter_review(review, now, fx);
                return true;
            }
        }
        let base = *self.supersets.unit(self.session.position.exercise).start();
        let target = self.supersets.representative(base.saturating_sub(1));
        self.cancel_countdown(fx);
        if self.unit_finished(target) {
            self.reopen_unit(target);
        }
        self.enter_unit(target, now, fx);
        true
    }

    fn select(&mut self, index: usize, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.session.is_empty() || matches!(self.phase, Phase::Complete | Phase::Unavailable) {
            return false;
        }
        let index = index.min(self.session.len() - 1);
        let rep = self.supersets.representative(index);
        self.cancel_countdown(fx);
        self.review = None;
        self.replay = None;
        if self.unit_finished(rep) {
            self.reopen_unit(rep);
        }
        self.enter_unit(rep, now, fx);
        true
    }

    fn do_it_now(&mut self, index: usize, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.phase != Phase::DeferredReview || index >= self.session.len() {
            return false;
        }
        let rep = self.supersets.representative(index);
        if !self.deferred.contains(rep) {
            return false;
        }
        self.replay = Some(rep);
        self.enter_unit(rep, now, fx);
        true
    }

    fn skip_for_good(&mut self, index: usize, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.phase != Phase::DeferredReview || index >= self.session.len() {
            return false;
        }
        let rep = self.supersets.representative(index);
        if !self.deferred.contains(rep) {
            return false;
        }
        self.resolve_skipped(rep, fx);
        self.after_resolution(now, fx);
        true
    }

    fn skip_all_deferred(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        let Some(review) = self.review.clone() else {
            return false;
        };
        if self.phase != Phase::DeferredReview {
            return false;
        }
        for rep in self.due(review.boundary, None) {
            self.resolve_skipped(rep, fx);
        }
        self.after_resolution(now, fx);
        true
    }

    fn evaluate_countdown(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if self.countdown.tick(now) == Tick::Expired {
            let kind = self.countdown.kind();
            tracing::debug!(?kind, phase = %self.phase, "countdown expired");
            match kind {
                Some(CountdownKind::GetReady) => self.enter_active(now, fx),
                Some(CountdownKind::Active) => self.complete_current_set(None, now, fx),
                Some(CountdownKind::Rest) => self.finish_rest(now, fx),
                None => {}
            }
        }
        true
    }

    fn suspend(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        if matches!(self.phase, Phase::Complete | Phase::Unavailable) {
            return false;
        }
        fx.push(Effect::FlushPending);
        fx.push(self.snapshot_effect(now));
        true
    }

    fn close(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) -> bool {
        self.closed = true;
        self.cancel_countdown(fx);
        if self.started && self.phase != Phase::Complete {
            if !self.session.is_empty() {
                fx.push(self.snapshot_effect(now));
            }
            fx.push(Effect::FlushPending);
            self.session.elapsed.stop(now);
            fx.push(Effect::SessionLog(SessionLogMeta::Close {
                workout: self.name.clone(),
                completed_exercises: self.session.completed_exercise_count(),
                elapsed_secs: self.session.elapsed.secs(now),
                finished: false,
            }));
        }
        fx.push(Effect::Emit(Event::SessionClosed));
        true
    }

    fn exercises_changed(
        &mut self,
        exercises: Vec<Exercise>,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) -> bool {
        let current_id = self.session.current().map(|e| e.id.clone());
        // Indices are stale after a reorder; ids are not
        let id_at = |i: usize| self.session.exercise(i).map(|e| e.id.clone());
        let deferred_ids: Vec<ExerciseId> = self
            .deferred
            .entries()
            .iter()
            .filter_map(|i| id_at(*i))
            .collect();
        let pending_next = self
            .review
            .as_ref()
            .and_then(|r| r.pending_next)
            .map(|i| (i, id_at(i)));
        let replay_id = self.replay.and_then(id_at);

        self.session.replace_exercises(exercises);
        self.supersets = SupersetCoordinator::new(self.session.exercises());

        let len = self.session.len();
        let session = &self.session;
        let supersets = &self.supersets;
        let index_of = |id: &ExerciseId| session.exercises().iter().position(|e| e.id == *id);
        let entries: Vec<usize> = deferred_ids
            .iter()
            .filter_map(index_of)
            .map(|i| supersets.representative(i))
            .collect();
        let pending_next = pending_next.and_then(|(old, id)| {
            match id.as_ref().and_then(index_of) {
                Some(i) => Some(supersets.representative(i)),
                None => Some(old).filter(|n| *n < len),
            }
        });
        let replay = replay_id
            .as_ref()
            .and_then(index_of)
            .map(|i| supersets.representative(i));

        self.deferred = DeferralQueue::from_entries(entries);
        self.prune_deferred();
        self.replay = replay;
        if let Some(review) = self.review.as_mut() {
            review.pending_next = pending_next;
        }
        tracing::info!(exercises = len, deferred = self.deferred.len(), "exercise list changed");

        if !self.started || self.phase == Phase::Complete {
            return true;
        }
        if self.session.is_empty() {
            self.enter_unavailable(fx);
            return true;
        }

        let moved = self.session.current().map(|e| e.id.clone()) != current_id;
        if self.phase == Phase::Unavailable || (moved && self.phase.is_playing()) {
            self.cancel_countdown(fx);
            self.replay = None;
            let position = self.session.position;
            self.enter_at(position, now, fx);
        } else if let Some(state) = &self.superset {
            if self.supersets.group_of(self.session.position.exercise).map(|g| g.start)
                != Some(state.group_start)
            {
                self.superset = None;
            }
        }
        true
    }

    fn history_loaded(
        &mut self,
        exercise_id: ExerciseId,
        history: &[HistorySession],
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) -> bool {
        let Some((index, exercise)) = self
            .session
            .exercises()
            .iter()
            .enumerate()
            .find(|(_, e)| e.id == exercise_id)
        else {
            return false;
        };
        let input = ProgressionInput {
            name: &exercise.name,
            compound: exercise.compound,
            prescribed_reps: exercise.reps,
            history: &history[..history.len().min(self.config.history_limit.max(1))],
            today: Some(now.date_naive()),
        };
        match recommend(&input, &self.config.progression) {
            Some(rec) => {
                self.recommendations.insert(exercise_id, rec);
                fx.push(Effect::Emit(Event::RecommendationReady {
                    exercise_index: index,
                }));
            }
            None => tracing::debug!(%exercise_id, "no qualifying history"),
        }
        true
    }

    // === Phase entry ===

    /// Enter the saved position if it is still playable, else the unit's
    /// first open set, else move on
    fn enter_at(&mut self, position: Position, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let index = position.exercise;
        let rep = self.supersets.representative(index);
        if self.unit_finished(rep) {
            self.advance_from(index, false, None, now, fx);
            return;
        }
        let open = position.set < self.session.set_count(index)
            && !self.session.is_set_complete(index, position.set);
        if !open {
            self.enter_unit(rep, now, fx);
            return;
        }
        let superset = self
            .supersets
            .group_of(index)
            .map(|g| SupersetState {
                group_start: g.start,
                member_pos: index - g.start,
                round: position.set,
            });
        self.enter_get_ready(position, superset, now, fx);
    }

    /// Enter a unit at its first incomplete set (or round)
    fn enter_unit(&mut self, index: usize, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        if let Some(group) = self.supersets.group_of(index).cloned() {
            let session = &self.session;
            let state = (0..group.total_rounds).find_map(|round| {
                group
                    .members()
                    .find(|m| session.set_count(*m) > round && !session.is_set_complete(*m, round))
                    .map(|m| SupersetState {
                        group_start: group.start,
                        member_pos: m - group.start,
                        round,
                    })
            });
            match state {
                Some(state) => {
                    let position = Position::new(state.exercise_index(), state.round);
                    self.enter_get_ready(position, Some(state), now, fx);
                }
                None => {
                    self.finish_group(&group, fx);
                    self.advance_from(group.end, false, None, now, fx);
                }
            }
            return;
        }
        match self.session.first_incomplete_set(index) {
            Some(set) => self.enter_get_ready(Position::new(index, set), None, now, fx),
            None => {
                self.finish_exercise(index, fx);
                self.advance_from(index, false, None, now, fx);
            }
        }
    }

    fn enter_get_ready(
        &mut self,
        position: Position,
        superset: Option<SupersetState>,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) {
        self.session.position = position;
        self.superset = superset;
        self.set_phase(Phase::GetReady, fx);
        self.request_history(position.exercise, fx);
        fx.push(self.snapshot_effect(now));
        let secs = self.config.get_ready_secs();
        if self.start_countdown(CountdownKind::GetReady, secs, now, fx) == Started::Immediate {
            self.enter_active(now, fx);
        }
    }

    fn enter_active(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.set_phase(Phase::Active, fx);
        let index = self.session.position.exercise;
        self.request_history(index, fx);
        let timed = self
            .session
            .exercise(index)
            .filter(|e| e.is_timed())
            .map(|e| e.duration_secs);
        match timed {
            Some(secs) => {
                if self.start_countdown(CountdownKind::Active, secs, now, fx) == Started::Immediate
                {
                    self.complete_current_set(None, now, fx);
                }
            }
            // Rep-tracked sets wait for "set done"
            None => self.cancel_countdown(fx),
        }
    }

    fn enter_rest(&mut self, secs: u32, then: RestNext, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.rest_then = then;
        self.set_phase(Phase::Rest, fx);
        fx.push(self.snapshot_effect(now));
        if self.start_countdown(CountdownKind::Rest, secs, now, fx) == Started::Immediate {
            self.finish_rest(now, fx);
        }
    }

    fn finish_rest(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        match self.rest_then {
            RestNext::Set => self.enter_active(now, fx),
            RestNext::Unit => {
                let index = self.session.position.exercise;
                self.enter_unit(index, now, fx);
            }
        }
    }

    fn enter_review(&mut self, review: Review, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.cancel_countdown(fx);
        self.superset = None;
        self.replay = None;
        tracing::info!(
            boundary = ?review.boundary,
            pending_next = ?review.pending_next,
            "deferred review"
        );
        self.review = Some(review);
        self.set_phase(Phase::DeferredReview, fx);
        fx.push(self.snapshot_effect(now));
    }

    fn enter_complete(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        self.cancel_countdown(fx);
        self.superset = None;
        self.review = None;
        self.replay = None;
        self.session.elapsed.stop(now);
        self.set_phase(Phase::Complete, fx);
        let elapsed_secs = self.session.elapsed.secs(now);
        tracing::info!(workout = %self.name, elapsed_secs, "workout complete");
        fx.push(Effect::Emit(Event::WorkoutComplete { elapsed_secs }));
        fx.push(Effect::SessionLog(SessionLogMeta::Close {
            workout: self.name.clone(),
            completed_exercises: self.session.completed_exercise_count(),
            elapsed_secs,
            finished: true,
        }));
        fx.push(Effect::ClearSnapshot);
    }

    fn enter_unavailable(&mut self, fx: &mut Vec<Effect>) {
        self.cancel_countdown(fx);
        self.superset = None;
        self.review = None;
        self.replay = None;
        tracing::warn!(workout = %self.name, "no exercises to play");
        self.set_phase(Phase::Unavailable, fx);
        fx.push(Effect::Emit(Event::WorkoutUnavailable));
    }

    // === Completion and advance ===

    fn complete_current_set(
        &mut self,
        entry: Option<&SetEntry>,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) {
        let Position { exercise: index, set } = self.session.position;
        self.session.complete_set(index, set, entry);
        fx.push(Effect::Emit(Event::SetCompleted {
            exercise_index: index,
            set_index: set,
        }));

        if let Some(group) = self.supersets.group_of(index).cloned() {
            let state = self.superset.clone().unwrap_or(SupersetState {
                group_start: group.start,
                member_pos: index - group.start,
                round: set,
            });
            match self
                .supersets
                .after_member_done(&group, &state, self.session.exercises())
            {
                RoundStep::NextMember(next) => {
                    self.session.position = Position::new(next.exercise_index(), next.round);
                    self.superset = Some(next);
                    fx.push(self.snapshot_effect(now));
                    self.enter_active(now, fx);
                }
                RoundStep::NextRound(next) => {
                    let rest = self.rest_after(index);
                    self.session.position = Position::new(next.exercise_index(), next.round);
                    self.superset = Some(next);
                    self.enter_rest(rest, RestNext::Set, now, fx);
                }
                RoundStep::GroupComplete => {
                    self.finish_group(&group, fx);
                    self.advance_from(group.end, true, None, now, fx);
                }
            }
            return;
        }

        match self.session.first_incomplete_set(index) {
            Some(next_set) => {
                let rest = self.rest_after(index);
                self.session.position = Position::new(index, next_set);
                self.enter_rest(rest, RestNext::Set, now, fx);
            }
            None => {
                self.finish_exercise(index, fx);
                self.advance_from(index, true, None, now, fx);
            }
        }
    }

    /// Move on after the unit containing `index` is done or set aside
    ///
    /// `rest` inserts the finished exercise's rest before the next unit.
    /// `deferred_now` is the entry whose deferral caused this advance; it
    /// does not count toward a phase boundary (it is still due at the end).
    fn advance_from(
        &mut self,
        index: usize,
        rest: bool,
        deferred_now: Option<usize>,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) {
        self.superset = None;
        self.prune_deferred();

        if let Some(rep) = self.replay.take() {
            if let Some(review) = self.review.clone() {
                if self.unit_finished(rep) {
                    fx.push(Effect::Emit(Event::DeferredResolved {
                        exercise_index: rep,
                        skipped: false,
                    }));
                }
                if self.due(review.boundary, None).is_empty() {
                    self.review = None;
                    self.go_to(review.pending_next, now, fx);
                } else {
                    self.enter_review(review, now, fx);
                }
                return;
            }
        }

        let from = self
            .session
            .exercise(index)
            .map(|e| e.phase)
            .unwrap_or_default();
        let next = self.next_playable(index);
        let to = next.and_then(|n| self.session.exercise(n)).map(|e| e.phase);
        if let Some(boundary) = Boundary::between(from, to) {
            let exclude = match boundary {
                Boundary::End => None,
                Boundary::Leaving(_) => deferred_now,
            };
            if !self.due(boundary, exclude).is_empty() {
                self.enter_review(
                    Review {
                        boundary,
                        pending_next: next,
                    },
                    now,
                    fx,
                );
                return;
            }
        }

        match next {
            Some(next) if rest => {
                let secs = self.rest_after(index);
                let set = self.session.first_incomplete_set(next).unwrap_or(0);
                self.session.position = Position::new(next, set);
                self.enter_rest(secs, RestNext::Unit, now, fx);
            }
            Some(next) => self.enter_unit(next, now, fx),
            None => self.enter_complete(now, fx),
        }
    }

    /// Continue to where a review was headed
    fn go_to(&mut self, target: Option<usize>, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let Some(target) = target.filter(|t| *t < self.session.len()) else {
            self.enter_complete(now, fx);
            return;
        };
        let rep = self.supersets.representative(target);
        if self.unit_finished(rep) || self.deferred.contains(rep) {
            self.advance_from(rep, false, None, now, fx);
        } else {
            self.enter_unit(rep, now, fx);
        }
    }

    fn after_resolution(&mut self, now: DateTime<Utc>, fx: &mut Vec<Effect>) {
        let Some(review) = self.review.clone() else {
            return;
        };
        if self.due(review.boundary, None).is_empty() {
            self.review = None;
            self.go_to(review.pending_next, now, fx);
        } else {
            fx.push(self.snapshot_effect(now));
        }
    }

    fn resolve_skipped(&mut self, rep: usize, fx: &mut Vec<Effect>) {
        self.skip_unit(rep, fx);
        self.deferred.remove(rep);
        fx.push(Effect::Emit(Event::DeferredResolved {
            exercise_index: rep,
            skipped: true,
        }));
    }

    fn finish_exercise(&mut self, index: usize, fx: &mut Vec<Effect>) {
        self.session.finish(index);
        self.persist(index, fx);
        fx.push(Effect::Emit(Event::ExerciseCompleted {
            exercise_index: index,
        }));
    }

    /// Every member reported complete in one step
    fn finish_group(&mut self, group: &SupersetGroup, fx: &mut Vec<Effect>) {
        for member in group.members() {
            self.session.finish(member);
        }
        for member in group.members() {
            self.persist(member, fx);
        }
        fx.push(Effect::Emit(Event::GroupCompleted {
            members: group.members().collect(),
        }));
    }

    /// Force-complete every member of a unit, keeping whatever was performed
    fn skip_unit(&mut self, index: usize, fx: &mut Vec<Effect>) {
        for member in self.supersets.unit(index) {
            self.session.skip_remaining(member);
            self.session.finish(member);
        }
        for member in self.supersets.unit(index) {
            self.persist(member, fx);
            fx.push(Effect::Emit(Event::ExerciseSkipped {
                exercise_index: member,
            }));
        }
    }

    fn reopen_unit(&mut self, index: usize) {
        for member in self.supersets.unit(index) {
            self.session.reopen(member);
        }
    }

    // === Helpers ===

    fn set_phase(&mut self, phase: Phase, fx: &mut Vec<Effect>) {
        self.phase = phase;
        let position = self.session.position;
        tracing::debug!(
            %phase,
            exercise_index = position.exercise,
            set_index = position.set,
            "phase"
        );
        fx.push(Effect::Emit(Event::PhaseChanged {
            phase,
            exercise_index: position.exercise,
            set_index: position.set,
        }));
    }

    /// Replace the live countdown; `Immediate` means nothing was started
    fn start_countdown(
        &mut self,
        kind: CountdownKind,
        secs: u32,
        now: DateTime<Utc>,
        fx: &mut Vec<Effect>,
    ) -> Started {
        let was_live = self.countdown.is_live();
        let started = self.countdown.start(kind, secs, now, self.paused);
        match started {
            Started::Pending => fx.push(Effect::StartCountdown {
                kind,
                secs,
                paused: self.paused,
            }),
            Started::Immediate if was_live => fx.push(Effect::CancelCountdown),
            Started::Immediate => {}
        }
        started
    }

    fn cancel_countdown(&mut self, fx: &mut Vec<Effect>) {
        if self.countdown.is_live() {
            fx.push(Effect::CancelCountdown);
        }
        self.countdown.cancel();
    }

    fn request_history(&mut self, index: usize, fx: &mut Vec<Effect>) {
        let Some(exercise) = self.session.exercise(index) else {
            return;
        };
        if self.history_requested.insert(exercise.id.clone()) {
            fx.push(Effect::LookupHistory {
                exercise_id: exercise.id.clone(),
                name: exercise.name.clone(),
            });
        }
    }

    fn persist(&self, index: usize, fx: &mut Vec<Effect>) {
        if let Some(exercise) = self.session.exercise(index) {
            fx.push(Effect::PersistSetLogs {
                exercise_id: exercise.id.clone(),
                logs: self.session.performed_logs(index),
            });
        }
    }

    fn rest_after(&self, index: usize) -> u32 {
        self.session
            .exercise(index)
            .map(|e| e.rest_secs)
            .unwrap_or(0)
    }

    fn unit_finished(&self, rep: usize) -> bool {
        self.supersets
            .unit(rep)
            .all(|m| self.session.is_finished(m))
    }

    fn prune_deferred(&mut self) {
        let session = &self.session;
        let supersets = &self.supersets;
        self.deferred
            .prune(|rep| supersets.unit(rep).all(|m| session.is_finished(m)));
    }

    fn due(&self, boundary: Boundary, exclude: Option<usize>) -> Vec<usize> {
        self.deferred.due(
            boundary,
            |i| self.session.exercise(i).map(|e| e.phase),
            |i| self.unit_finished(i),
            exclude,
        )
    }

    /// First unit after the one containing `after` that is neither
    /// finished nor deferred
    fn next_playable(&self, after: usize) -> Option<usize> {
        let mut i = *self.supersets.unit(after).end() + 1;
        while i < self.session.len() {
            let unit = self.supersets.unit(i);
            let rep = *unit.start();
            if !self.deferred.contains(rep) && !self.unit_finished(rep) {
                return Some(rep);
            }
            i = *unit.end() + 1;
        }
        None
    }

    fn snapshot_effect(&self, now: DateTime<Utc>) -> Effect {
        Effect::SaveSnapshot(Box::new(self.snapshot(now)))
    }

    // === Queries ===

    /// Everything needed to resume this workout later
    pub fn snapshot(&self, now: DateTime<Utc>) -> ResumeSnapshot {
        let position = self.session.position;
        ResumeSnapshot {
            version: SNAPSHOT_VERSION,
            exercise_index: position.exercise,
            set_index: position.set,
            elapsed_secs: self.session.elapsed.secs(now),
            completed: (0..self.session.len())
                .map(|i| self.session.completed_sets(i))
                .collect(),
            finished: self.session.finished(),
            logs: self.session.all_logs().to_vec(),
            deferred: self.deferred.entries().to_vec(),
            pending_next: self.review.as_ref().and_then(|r| r.pending_next),
            superset: self.superset.clone(),
            exercise_name: self
                .session
                .current()
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            exercise_count: self.session.len(),
            saved_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn position(&self) -> Position {
        self.session.position
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn superset(&self) -> Option<&SupersetState> {
        self.superset.as_ref()
    }

    pub fn supersets(&self) -> &SupersetCoordinator {
        &self.supersets
    }

    pub fn deferred(&self) -> &DeferralQueue {
        &self.deferred
    }

    /// Entries the current review still has to resolve
    pub fn review_entries(&self) -> Vec<usize> {
        match (&self.review, self.phase) {
            (Some(review), Phase::DeferredReview) => self.due(review.boundary, None),
            _ => Vec::new(),
        }
    }

    pub fn review_boundary(&self) -> Option<Boundary> {
        self.review.as_ref().map(|r| r.boundary)
    }

    pub fn pending_next(&self) -> Option<usize> {
        self.review.as_ref().and_then(|r| r.pending_next)
    }

    /// The deferred entry being replayed, if any
    pub fn replay(&self) -> Option<usize> {
        self.replay
    }

    pub fn recommendation(&self, index: usize) -> Option<&Recommendation> {
        let exercise = self.session.exercise(index)?;
        self.recommendations.get(&exercise.id)
    }

    /// Next unit normal flow would play after the current one
    pub fn up_next(&self) -> Option<usize> {
        match self.phase {
            Phase::Rest if self.rest_then == RestNext::Unit => Some(self.session.position.exercise),
            Phase::DeferredReview => self.pending_next(),
            Phase::Complete | Phase::Unavailable => None,
            _ => self.next_playable(self.session.position.exercise),
        }
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u32> {
        self.countdown.remaining(now)
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        self.session.elapsed.secs(now)
    }
}

#[cfg(test)]
#[path = "workout_tests.rs"]
mod tests;
