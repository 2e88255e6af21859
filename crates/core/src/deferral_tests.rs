// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    same_phase = { WorkoutPhase::Main, Some(WorkoutPhase::Main), None },
    into_cooldown = { WorkoutPhase::Main, Some(WorkoutPhase::Cooldown), Some(Boundary::Leaving(WorkoutPhase::Main)) },
    out_of_warmup = { WorkoutPhase::Warmup, Some(WorkoutPhase::Main), Some(Boundary::Leaving(WorkoutPhase::Warmup)) },
    end_of_session = { WorkoutPhase::Cooldown, None, Some(Boundary::End) },
)]
fn boundary_detection(from: WorkoutPhase, to: Option<WorkoutPhase>, expected: Option<Boundary>) {
    assert_eq!(Boundary::between(from, to), expected);
}

#[test]
fn end_boundary_covers_every_phase() {
    assert!(Boundary::End.covers(WorkoutPhase::Warmup));
    assert!(Boundary::End.covers(WorkoutPhase::Cooldown));
    assert!(!Boundary::Leaving(WorkoutPhase::Main).covers(WorkoutPhase::Warmup));
}

#[test]
fn deferring_twice_keeps_one_entry() {
    let mut queue = DeferralQueue::new();
    assert!(queue.defer(2));
    assert!(!queue.defer(2));
    assert_eq!(queue.entries(), &[2]);
}

#[test]
fn remove_reports_whether_anything_changed() {
    let mut queue = DeferralQueue::from_entries([1, 3]);
    assert!(queue.remove(1));
    assert!(!queue.remove(1));
    assert_eq!(queue.len(), 1);
}

#[test]
fn due_filters_by_phase_completion_and_exclusion() {
    let phases = [
        WorkoutPhase::Warmup,
        WorkoutPhase::Main,
        WorkoutPhase::Main,
        WorkoutPhase::Cooldown,
    ];
    let phase_of = |i: usize| phases.get(i).copied();
    let queue = DeferralQueue::from_entries([0, 1, 2]);
    let leaving_main = Boundary::Leaving(WorkoutPhase::Main);

    assert_eq!(queue.due(leaving_main, phase_of, |_| false, None), vec![1, 2]);
    assert_eq!(queue.due(leaving_main, phase_of, |i| i == 1, None), vec![2]);
    assert_eq!(queue.due(leaving_main, phase_of, |_| false, Some(2)), vec![1]);
    assert_eq!(queue.due(Boundary::End, phase_of, |_| false, None), vec![0, 1, 2]);
}

#[test]
fn prune_and_clamp() {
    let mut queue = DeferralQueue::from_entries([0, 4, 7]);
    queue.prune(|i| i == 0);
    assert_eq!(queue.entries(), &[4, 7]);
    queue.clamp(5);
    assert_eq!(queue.entries(), &[4]);
}

#[test]
fn serializes_as_a_plain_list() {
    let queue = DeferralQueue::from_entries([3, 1]);
    assert_eq!(serde_json::to_string(&queue).unwrap(), "[3,1]");
}
