//! History specs
//!
//! History is read back from the journal the run command writes.

use crate::prelude::*;

pub const SQUAT_JOURNAL: &str = concat!(
    r#"{"seq":1,"at":"2026-04-14T08:00:00Z","record":{"kind":"set_logs","exercise_id":"squat","name":"Squat","logs":[{"reps":5,"weight":95.0,"rest_secs":90,"effort":"moderate"},{"reps":5,"weight":95.0,"rest_secs":90,"effort":"moderate"}]}}"#,
    "\n",
    r#"{"seq":2,"at":"2026-04-21T08:00:00Z","record":{"kind":"set_logs","exercise_id":"squat","name":"Squat","logs":[{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"},{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"}]}}"#,
    "\n",
);

#[test]
fn history_lists_sessions_newest_first() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", SQUAT_JOURNAL);

    let out = temp
        .gw()
        .args(&["history", "squat"])
        .passes()
        .stdout_has("2026-04-21  5x100, 5x100")
        .stdout_has("2026-04-14  5x95, 5x95")
        .stdout_has("best: 100 kg")
        .stdout_has("workouts: 2")
        .stdout();

    let newest = out.find("2026-04-21").unwrap();
    let oldest = out.find("2026-04-14").unwrap();
    assert!(newest < oldest);
}

#[test]
fn history_matches_names_case_insensitively() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", SQUAT_JOURNAL);

    temp.gw()
        .args(&["history", "SQUAT", "--limit", "1"])
        .passes()
        .stdout_has("2026-04-21")
        .stdout_lacks("2026-04-14");
}

#[test]
fn history_as_json_carries_stats() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", SQUAT_JOURNAL);

    let json = temp
        .gw()
        .args(&["history", "squat", "-o", "json"])
        .passes()
        .json();

    assert_eq!(json["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(json["stats"]["all_time_max_weight"], 100.0);
    assert_eq!(json["stats"]["total_workouts"], 2);
}

#[test]
fn history_for_unknown_exercise_fails() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", SQUAT_JOURNAL);

    temp.gw()
        .args(&["history", "Deadlift"])
        .fails()
        .stderr_has("No history for 'Deadlift'");
}
