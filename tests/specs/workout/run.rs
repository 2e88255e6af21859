//! Interactive run specs
//!
//! Input is scripted on stdin; end of input closes the workout.

use crate::prelude::*;

#[test]
fn single_set_workout_completes() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("quick.toml", ONE_SET_PLAN);

    temp.gw()
        .args(&["run", "quick.toml"])
        .stdin("done\n")
        .passes()
        .stdout_has("Go! Push Up, set 1 of 1: 10 reps")
        .stdout_has("Finished Push Up")
        .stdout_has("Workout complete in");
}

#[test]
fn completed_sets_are_journaled() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("quick.toml", ONE_SET_PLAN);

    temp.gw()
        .args(&["run", "quick.toml"])
        .stdin("done 12 easy\n")
        .passes();

    let journal = temp.read("state/journal.jsonl");
    assert!(journal.contains("\"kind\":\"set_logs\""));
    assert!(journal.contains("\"name\":\"Push Up\""));
    assert!(journal.contains("\"reps\":12"));
    assert!(journal.contains("\"effort\":\"easy\""));
}

#[test]
fn no_log_leaves_journal_alone() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("quick.toml", ONE_SET_PLAN);

    temp.gw()
        .args(&["run", "quick.toml", "--no-log"])
        .stdin("done\n")
        .passes()
        .stdout_has("Workout complete");

    assert!(!temp.state_dir().join("journal.jsonl").exists());
}

#[test]
fn skipping_moves_to_next_exercise() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("legs.toml", LEG_DAY_PLAN);

    temp.gw()
        .args(&["run", "legs.toml", "--no-log"])
        .stdin("skip\nquit\n")
        .passes()
        .stdout_has("Skipped Squat")
        .stdout_has("Lunge");
}

#[test]
fn bad_input_is_reported_and_ignored() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("quick.toml", ONE_SET_PLAN);

    temp.gw()
        .args(&["run", "quick.toml", "--no-log"])
        .stdin("jump\ndone\n")
        .passes()
        .stderr_has("unknown command 'jump'")
        .stdout_has("Workout complete");
}

#[test]
fn quitting_saves_progress() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("legs.toml", LEG_DAY_PLAN);

    temp.gw()
        .args(&["run", "legs.toml"])
        .stdin("done\nquit\n")
        .passes()
        .stdout_has("Finished Squat")
        .stdout_has("Progress saved");

    assert!(temp.state_dir().join("snapshots/leg-day.json").exists());
}

const SQUAT_HISTORY: &str = concat!(
    r#"{"seq":1,"at":"2026-04-21T08:00:00Z","record":{"kind":"set_logs","exercise_id":"squat","name":"Squat","logs":[{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"},{"reps":5,"weight":100.0,"rest_secs":90,"effort":"moderate"}]}}"#,
    "\n",
);

#[test]
fn advice_is_shown_from_history() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("legs.toml", LEG_DAY_PLAN);
    temp.file("state/journal.jsonl", SQUAT_HISTORY);

    temp.gw()
        .args(&["run", "legs.toml", "--no-log"])
        .stdin("quit\n")
        .passes()
        .stdout_has("Suggested: 2 x 3 @ 105 kg");
}

#[test]
fn no_advice_skips_history() {
    let temp = Project::empty();
    temp.config(FAST_CONFIG);
    temp.file("legs.toml", LEG_DAY_PLAN);
    temp.file("state/journal.jsonl", SQUAT_HISTORY);

    temp.gw()
        .args(&["run", "legs.toml", "--no-log", "--no-advice"])
        .stdin("quit\n")
        .passes()
        .stdout_lacks("Suggested");
}
