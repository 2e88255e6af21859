//! Error reporting specs
//!
//! Failures exit non-zero with an explanation and a suggestion on stderr.

use crate::prelude::*;

#[test]
fn missing_plan_file() {
    let temp = Project::empty();

    temp.gw()
        .args(&["plan", "nope.toml"])
        .fails()
        .stderr_has("error: Cannot load plan 'nope.toml'")
        .stderr_has("suggestions:");
}

#[test]
fn plan_without_exercises() {
    let temp = Project::empty();
    temp.file("empty.toml", "name = \"Empty\"\n");

    temp.gw()
        .args(&["run", "empty.toml"])
        .fails()
        .stderr_has("plan has no exercises");
}

#[test]
fn exercise_without_name() {
    let temp = Project::empty();
    temp.file("blank.toml", "[[exercises]]\nname = \"  \"\n");

    temp.gw()
        .args(&["plan", "blank.toml"])
        .fails()
        .stderr_has("exercise 0 has no name");
}

#[test]
fn unreadable_config() {
    let temp = Project::empty();
    temp.config("get_ready = 10\n");
    temp.file("quick.toml", ONE_SET_PLAN);

    temp.gw()
        .args(&["plan", "quick.toml"])
        .fails()
        .stderr_has("Cannot read config")
        .stderr_has("humantime");
}

#[test]
fn unknown_subcommand() {
    let temp = Project::empty();

    temp.gw().args(&["lift"]).fails();
}
