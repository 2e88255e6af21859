// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn command(line: &str) -> WorkoutEvent {
    match parse_line(line) {
        Ok(Some(Input::Command(event))) => event,
        other => panic!("expected a command for {:?}, got {:?}", line, other),
    }
}

fn exercises() -> Vec<Exercise> {
    vec![
        Exercise::reps("squat", "Squat", 3, 5).with_weight(100.0),
        Exercise::timed("plank", "Plank", 2, 45),
    ]
}

#[test]
fn blank_line_is_ignored() {
    assert_eq!(parse_line("   "), Ok(None));
}

#[test]
fn done_takes_reps_weight_and_effort() {
    assert_eq!(
        command("done 8 102.5 hard"),
        WorkoutEvent::MarkSetDone(SetEntry::reps(8).with_weight(102.5).with_effort(Effort::Hard))
    );
    assert_eq!(command("d"), WorkoutEvent::MarkSetDone(SetEntry::default()));
    assert_eq!(
        command("done easy"),
        WorkoutEvent::MarkSetDone(SetEntry {
            effort: Some(Effort::Easy),
            ..SetEntry::default()
        })
    );
}

#[test]
fn done_rejects_fractional_reps_and_unknown_effort() {
    assert!(parse_line("done 7.5").is_err());
    assert!(parse_line("done 8 100 sleepy").is_err());
    assert!(parse_line("done 8 100 5").is_err());
}

#[test]
fn exercise_numbers_are_one_based() {
    assert_eq!(command("go 2"), WorkoutEvent::SelectExercise(1));
    assert_eq!(command("now 3"), WorkoutEvent::DoItNow(2));
    assert_eq!(command("drop 1"), WorkoutEvent::SkipForGood(0));
    assert_eq!(
        command("defer 4"),
        WorkoutEvent::Defer {
            exercise_index: Some(3)
        }
    );
    assert_eq!(
        command("defer"),
        WorkoutEvent::Defer {
            exercise_index: None
        }
    );
    assert!(parse_line("go 0").is_err());
    assert!(parse_line("now").is_err());
}

#[test]
fn other_verbs() {
    assert_eq!(command("SKIP"), WorkoutEvent::Skip);
    assert_eq!(command("skip-all"), WorkoutEvent::SkipAllDeferred);
    assert_eq!(command("back"), WorkoutEvent::Back);
    assert_eq!(command("p"), WorkoutEvent::Pause);
    assert_eq!(command("resume"), WorkoutEvent::Resume);
    assert_eq!(parse_line("status"), Ok(Some(Input::Status)));
    assert_eq!(parse_line("?"), Ok(Some(Input::Help)));
    assert_eq!(parse_line("quit"), Ok(Some(Input::Quit)));
    assert!(parse_line("jump").is_err());
}

#[test]
fn prescription_text() {
    let list = exercises();
    assert_eq!(prescription(&list[0], WeightUnit::Kg), "5 reps @ 100 kg");
    assert_eq!(prescription(&list[1], WeightUnit::Lb), "45s");
}

#[test]
fn phase_lines_name_the_exercise() {
    let list = exercises();
    let line = |phase, exercise_index, set_index| {
        describe(
            &Event::PhaseChanged {
                phase,
                exercise_index,
                set_index,
            },
            &list,
            WeightUnit::Kg,
        )
    };

    assert_eq!(
        line(Phase::GetReady, 0, 0).as_deref(),
        Some("Get ready: Squat (set 1 of 3)")
    );
    assert_eq!(
        line(Phase::Active, 0, 1).as_deref(),
        Some("Go! Squat, set 2 of 3: 5 reps @ 100 kg")
    );
    assert_eq!(
        line(Phase::Rest, 1, 0).as_deref(),
        Some("Rest. Up next: Plank, set 1 of 2")
    );
    assert_eq!(line(Phase::Complete, 1, 1), None);
}

#[test]
fn completion_line_shows_elapsed() {
    let line = describe(
        &Event::WorkoutComplete { elapsed_secs: 1805 },
        &exercises(),
        WeightUnit::Kg,
    );
    assert_eq!(line.as_deref(), Some("Workout complete in 30:05"));
}

#[test]
fn recommendation_line() {
    let rec = Recommendation {
        sets: 3,
        reps: 5,
        weight: 105.0,
        reasoning: "All sets felt manageable".to_string(),
        plateau: false,
    };
    assert_eq!(
        describe_recommendation(&rec, WeightUnit::Kg),
        "Suggested: 3 x 5 @ 105 kg (All sets felt manageable)"
    );
}
