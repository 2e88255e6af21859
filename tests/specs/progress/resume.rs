//! Saved progress specs
//!
//! Quitting mid-workout leaves a snapshot; running the plan again picks
//! it up unless `--fresh` is given.

use crate::prelude::*;

fn quit_after_first_exercise(temp: &Project) {
    temp.config(FAST_CONFIG);
    temp.file("legs.toml", LEG_DAY_PLAN);
    temp.gw()
        .args(&["run", "legs.toml"])
        .stdin("done\nquit\n")
        .passes();
}

#[test]
fn nothing_saved_initially() {
    let temp = Project::empty();

    temp.gw()
        .args(&["resume", "list"])
        .passes()
        .stdout_eq("No saved progress\n");
}

#[test]
fn saved_progress_is_listed() {
    let temp = Project::empty();
    quit_after_first_exercise(&temp);

    temp.gw()
        .args(&["resume", "list"])
        .passes()
        .stdout_has("leg-day: Lunge (exercise 2 of 2, set 1)");
}

#[test]
fn running_again_resumes() {
    let temp = Project::empty();
    quit_after_first_exercise(&temp);

    temp.gw()
        .args(&["run", "legs.toml"])
        .stdin("quit\n")
        .passes()
        .stdout_has("Resuming Leg Day at Lunge");
}

#[test]
fn fresh_start_discards_progress() {
    let temp = Project::empty();
    quit_after_first_exercise(&temp);

    temp.gw()
        .args(&["run", "legs.toml", "--fresh"])
        .stdin("quit\n")
        .passes()
        .stdout_lacks("Resuming")
        .stdout_has("Squat");
}

#[test]
fn finishing_clears_progress() {
    let temp = Project::empty();
    quit_after_first_exercise(&temp);

    temp.gw()
        .args(&["run", "legs.toml"])
        .stdin("done\n")
        .passes()
        .stdout_has("Workout complete");

    temp.gw()
        .args(&["resume", "list"])
        .passes()
        .stdout_eq("No saved progress\n");
}

#[test]
fn show_and_clear() {
    let temp = Project::empty();
    quit_after_first_exercise(&temp);

    let json = temp
        .gw()
        .args(&["resume", "show", "Leg Day", "-o", "json"])
        .passes()
        .json();
    assert_eq!(json["exercise"], "Lunge");
    assert_eq!(json["exercise_index"], 1);

    temp.gw()
        .args(&["resume", "clear", "Leg Day"])
        .passes()
        .stdout_eq("Cleared saved progress for Leg Day\n");

    temp.gw()
        .args(&["resume", "show", "Leg Day"])
        .fails()
        .stderr_has("No saved progress for 'Leg Day'");
}
