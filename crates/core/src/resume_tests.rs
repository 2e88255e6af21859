// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn saved_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 7, 0, 0).unwrap()
}

fn snapshot() -> ResumeSnapshot {
    ResumeSnapshot {
        version: SNAPSHOT_VERSION,
        exercise_index: 2,
        set_index: 1,
        elapsed_secs: 900,
        completed: vec![vec![0, 1, 2], vec![0, 1, 2], vec![0]],
        finished: vec![0, 1],
        logs: vec![vec![], vec![], vec![]],
        deferred: vec![],
        pending_next: None,
        superset: None,
        exercise_name: "Row".to_string(),
        exercise_count: 3,
        saved_at: saved_at(),
    }
}

#[parameterized(
    fresh = { 0 },
    one_hour = { 60 },
    just_under = { 12 * 60 - 1 },
)]
fn young_snapshot_is_valid(minutes: i64) {
    let now = saved_at() + chrono::Duration::minutes(minutes);
    assert_eq!(snapshot().validate(3, now, DEFAULT_TTL), Ok(()));
}

#[parameterized(
    exactly_twelve_hours = { 12 * 60 },
    twelve_hours_one_minute = { 12 * 60 + 1 },
    two_days = { 48 * 60 },
)]
fn old_snapshot_is_rejected_even_with_matching_count(minutes: i64) {
    let now = saved_at() + chrono::Duration::minutes(minutes);
    assert!(matches!(
        snapshot().validate(3, now, DEFAULT_TTL),
        Err(Rejection::Expired { .. })
    ));
}

#[test]
fn count_mismatch_is_rejected() {
    assert_eq!(
        snapshot().validate(4, saved_at(), DEFAULT_TTL),
        Err(Rejection::CountMismatch { saved: 3, live: 4 })
    );
}

#[test]
fn unknown_version_is_rejected() {
    let mut snap = snapshot();
    snap.version = 99;
    assert_eq!(
        snap.validate(3, saved_at(), DEFAULT_TTL),
        Err(Rejection::Version(99))
    );
}

#[test]
fn clock_skew_counts_as_fresh() {
    let earlier = saved_at() - chrono::Duration::minutes(5);
    assert_eq!(snapshot().age_secs(earlier), 0);
}

#[test]
fn snapshot_json_uses_stable_field_names() {
    let json = serde_json::to_value(snapshot()).unwrap();
    for field in [
        "exercise_index",
        "set_index",
        "elapsed_secs",
        "completed",
        "logs",
        "deferred",
        "pending_next",
        "superset",
        "exercise_name",
        "saved_at",
    ] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }
    let back: ResumeSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snapshot());
}
