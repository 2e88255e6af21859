// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::exercise::Effort;
use chrono::TimeZone;

fn session() -> Session {
    Session::new(vec![
        Exercise::reps("squat", "Squat", 3, 5).with_weight(100.0),
        Exercise::timed("plank", "Plank", 2, 45),
        Exercise::reps("curl", "Curl", 0, 12),
    ])
}

#[test]
fn logs_start_prescribed() {
    let s = session();
    assert_eq!(s.logs(0).len(), 3);
    assert_eq!(s.logs(0)[0].reps, 5);
    assert_eq!(s.logs(0)[0].weight, Some(100.0));
    assert_eq!(s.logs(1)[1].duration_secs, Some(45));
    // Zero prescribed sets still means one set
    assert_eq!(s.logs(2).len(), 1);
    assert_eq!(s.total_sets(), 6);
}

#[test]
fn complete_set_merges_entry() {
    let mut s = session();
    let entry = SetEntry::reps(4).with_effort(Effort::Hard);
    s.complete_set(0, 1, Some(&entry));
    assert!(s.is_set_complete(0, 1));
    assert_eq!(s.logs(0)[1].reps, 4);
    assert_eq!(s.logs(0)[1].effort, Effort::Hard);
    assert_eq!(s.logs(0)[1].weight, Some(100.0));
    assert_eq!(s.first_incomplete_set(0), Some(0));
}

#[test]
fn out_of_range_set_is_ignored() {
    let mut s = session();
    s.complete_set(0, 9, None);
    s.complete_set(9, 0, None);
    assert_eq!(s.completed_set_count(), 0);
}

#[test]
fn skipped_sets_count_as_complete_but_are_not_performed() {
    let mut s = session();
    s.complete_set(0, 0, Some(&SetEntry::reps(5)));
    s.skip_remaining(0);
    assert!(s.is_exercise_complete(0));
    assert_eq!(s.completed_sets(0), vec![0, 1, 2]);
    assert_eq!(s.performed_logs(0).len(), 1);
}

#[test]
fn reopen_clears_completion() {
    let mut s = session();
    s.skip_remaining(1);
    s.finish(1);
    assert!(s.is_exercise_complete(1));
    s.reopen(1);
    assert!(!s.is_exercise_complete(1));
    assert!(!s.is_finished(1));
    assert_eq!(s.first_incomplete_set(1), Some(0));
}

#[test]
fn progress_is_completed_over_total_sets() {
    let mut s = session();
    assert_eq!(s.progress_pct(), 0);
    s.complete_set(0, 0, None);
    s.complete_set(0, 1, None);
    assert_eq!(s.progress_pct(), 33);
    for i in 0..3 {
        s.skip_remaining(i);
    }
    assert_eq!(s.progress_pct(), 100);
    // Sets being done is not the same as being reported complete
    assert_eq!(s.completed_exercise_count(), 0);
    assert!(!s.is_all_finished());
    for i in 0..3 {
        s.finish(i);
    }
    assert!(s.is_all_finished());
    assert_eq!(s.completed_exercise_count(), 3);
    assert_eq!(s.finished(), vec![0, 1, 2]);
}

#[test]
fn replacing_exercises_carries_progress_by_id() {
    let mut s = session();
    s.complete_set(1, 0, Some(&SetEntry::default()));
    s.finish(0);
    s.position = Position::new(2, 0);

    let mut reordered = s.exercises().to_vec();
    reordered.reverse();
    reordered.pop();
    s.replace_exercises(reordered);

    assert_eq!(s.len(), 2);
    assert_eq!(s.exercise(1).unwrap().id.0, "plank");
    assert!(s.is_set_complete(1, 0));
    assert!(!s.is_finished(0));
    assert_eq!(s.position, Position::new(1, 0));
}

#[test]
fn clamp_on_empty_list_reports_nothing() {
    let mut s = session();
    s.replace_exercises(Vec::new());
    assert!(s.is_empty());
    assert!(!s.clamp_position());
    assert_eq!(s.current(), None);
}

#[test]
fn restore_progress_ignores_out_of_range() {
    let mut s = session();
    let mut logs = s.all_logs().to_vec();
    logs[0][0].reps = 3;
    s.restore_progress(&[vec![0, 7], vec![1], vec![], vec![0]], &[2, 9], &logs);
    assert_eq!(s.completed_sets(0), vec![0]);
    assert!(s.is_finished(2));
    assert_eq!(s.completed_sets(1), vec![1]);
    assert_eq!(s.logs(0)[0].reps, 3);
}

#[test]
fn elapsed_accumulates_segments() {
    let t0 = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
    let mut elapsed = Elapsed::default();
    assert_eq!(elapsed.secs(t0), 0);
    elapsed.start(t0);
    assert_eq!(elapsed.secs(t0 + chrono::Duration::seconds(90)), 90);
    elapsed.stop(t0 + chrono::Duration::seconds(100));
    assert!(!elapsed.is_running());
    assert_eq!(elapsed.secs(t0 + chrono::Duration::seconds(500)), 100);

    let mut resumed = Elapsed::with_base(100);
    resumed.start(t0);
    resumed.start(t0 + chrono::Duration::seconds(30));
    assert_eq!(resumed.secs(t0 + chrono::Duration::seconds(60)), 160);
}
