//! Progression advice specs

use crate::prelude::*;

const ONE_SESSION: &str = concat!(
    r#"{"seq":1,"at":"2026-04-21T08:00:00Z","record":{"kind":"set_logs","exercise_id":"squat","name":"Squat","logs":[{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"},{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"},{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"}]}}"#,
    "\n",
);

#[test]
fn hitting_target_reps_adds_compound_increment() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", ONE_SESSION);

    temp.gw()
        .args(&["advise", "Squat", "--reps", "5"])
        .passes()
        .stdout_has("Squat: Suggested: 3 x")
        .stdout_has("@ 105 kg");
}

#[test]
fn isolation_flag_uses_smaller_increment() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", ONE_SESSION);

    let json = temp
        .gw()
        .args(&["advise", "squat", "--reps", "5", "--isolation", "-o", "json"])
        .passes()
        .json();

    assert_eq!(json["weight"], 102.5);
    assert_eq!(json["sets"], 3);
    assert_eq!(json["plateau"], false);
}

#[test]
fn configured_unit_is_shown() {
    let temp = Project::empty();
    temp.file("state/journal.jsonl", ONE_SESSION);
    temp.config("[progression]\nunit = \"lb\"\n");

    temp.gw()
        .args(&["advise", "squat", "--reps", "5"])
        .passes()
        .stdout_has("@ 105 lb");
}

#[test]
fn advice_without_history_fails() {
    let temp = Project::empty();

    temp.gw()
        .args(&["advise", "Squat"])
        .fails()
        .stderr_has("No history for 'Squat'");
}
