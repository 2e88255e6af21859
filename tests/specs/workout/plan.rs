//! Plan preview specs
//!
//! `gw plan` shows exercises with every default filled in.

use crate::prelude::*;

#[test]
fn plan_fills_in_defaults() {
    let temp = Project::empty();
    temp.file("legs.toml", LEG_DAY_PLAN);

    temp.gw()
        .args(&["plan", "legs.toml"])
        .passes()
        .stdout_eq(
            "Leg Day (2 exercises)\n\
             \x20 1. Squat: 1 x 5 reps @ 100 kg, rest 60s\n\
             \x20 2. Lunge: 1 x 8 reps, rest 60s\n",
        );
}

#[test]
fn plan_name_falls_back_to_file_stem() {
    let temp = Project::empty();
    temp.file("push.toml", "[[exercises]]\nname = \"Push Up\"\n");

    temp.gw()
        .args(&["plan", "push.toml"])
        .passes()
        .stdout_has("push (1 exercises)")
        .stdout_has("Push Up: 3 x 12 reps");
}

#[test]
fn plan_marks_supersets_and_timed_sets() {
    let temp = Project::empty();
    temp.file(
        "core.toml",
        r#"
name = "Core"

[[exercises]]
name = "Plank"
duration = 45
group = "A"

[[exercises]]
name = "Crunch"
reps = 20
group = "A"

[[exercises]]
name = "Stretch"
phase = "cooldown"
duration = 60
"#,
    );

    temp.gw()
        .args(&["plan", "core.toml"])
        .passes()
        .stdout_has("Plank: 3 x 45s, rest 60s [superset A]")
        .stdout_has("Stretch: 3 x 60s, rest 60s (cooldown)");
}

#[test]
fn plan_as_json() {
    let temp = Project::empty();
    temp.file("legs.toml", LEG_DAY_PLAN);

    let json = temp
        .gw()
        .args(&["plan", "legs.toml", "-o", "json"])
        .passes()
        .json();

    assert_eq!(json["name"], "Leg Day");
    assert_eq!(json["exercises"][1]["id"], "lunge");
    assert_eq!(json["exercises"][1]["reps"], 8);
    assert_eq!(json["exercises"][1]["sets"], 1);
}
