// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented console for an interactive workout
//!
//! Input lines become workout commands; emitted events and views become
//! short status lines. Exercise numbers typed by the user are one-based.

use crate::output::{clock_time, weight};
use gw_core::{
    Effort, Event, Exercise, Phase, Recommendation, SetEntry, WeightUnit, WorkoutEvent,
    WorkoutView,
};

pub const HELP: &str = "\
commands:
  done [reps] [weight] [effort]  finish the current set (effort: easy|moderate|hard|maxed)
  skip                           skip the rest of this exercise
  defer [n]                      come back to this exercise (or exercise n) later
  back                           return to the previous exercise
  go <n>                         jump to exercise n
  now <n>                        do deferred exercise n now
  drop <n>                       skip deferred exercise n for good
  skip-all                       skip every deferred exercise
  pause | resume                 hold or continue the countdown
  status                         show where you are
  quit                           save progress and exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(WorkoutEvent),
    Status,
    Help,
    Quit,
}

/// Parse one line of user input; blank lines parse to `None`
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let input = match verb.to_ascii_lowercase().as_str() {
        "done" | "d" => Input::Command(WorkoutEvent::MarkSetDone(parse_entry(&args)?)),
        "skip" | "s" => Input::Command(WorkoutEvent::Skip),
        "defer" => Input::Command(WorkoutEvent::Defer {
            exercise_index: args.first().map(|n| exercise_number(n)).transpose()?,
        }),
        "back" | "b" => Input::Command(WorkoutEvent::Back),
        "go" | "select" => Input::Command(WorkoutEvent::SelectExercise(required_number(&args)?)),
        "now" => Input::Command(WorkoutEvent::DoItNow(required_number(&args)?)),
        "drop" => Input::Command(WorkoutEvent::SkipForGood(required_number(&args)?)),
        "skip-all" => Input::Command(WorkoutEvent::SkipAllDeferred),
        "pause" | "p" => Input::Command(WorkoutEvent::Pause),
        "resume" | "r" => Input::Command(WorkoutEvent::Resume),
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        other => return Err(format!("unknown command '{}' (type 'help')", other)),
    };
    Ok(Some(input))
}

/// `done [reps] [weight] [effort]`; any trailing word that is not a number
/// is read as the effort
fn parse_entry(args: &[&str]) -> Result<SetEntry, String> {
    let mut entry = SetEntry::default();
    let mut numbers = 0;
    for arg in args {
        if let Ok(value) = arg.parse::<f64>() {
            match numbers {
                0 if value >= 0.0 && value.fract() == 0.0 => entry.reps = Some(value as u32),
                0 => return Err(format!("reps must be a whole number, got '{}'", arg)),
                1 => entry.weight = Some(value),
                _ => return Err(format!("unexpected '{}'", arg)),
            }
            numbers += 1;
        } else {
            let effort =
                Effort::parse(arg).ok_or_else(|| format!("unknown effort '{}'", arg))?;
            entry.effort = Some(effort);
        }
    }
    Ok(entry)
}

fn exercise_number(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected an exercise number, got '{}'", arg)),
    }
}

fn required_number(args: &[&str]) -> Result<usize, String> {
    let arg = args.first().ok_or("expected an exercise number")?;
    exercise_number(arg)
}

/// The prescription for one set, e.g. "5 reps @ 100 kg" or "30s"
pub fn prescription(exercise: &Exercise, unit: WeightUnit) -> String {
    let target = if exercise.is_timed() {
        format!("{}s", exercise.duration_secs)
    } else {
        format!("{} reps", exercise.reps)
    };
    match exercise.weight {
        Some(w) if w > 0.0 => format!("{} @ {} {}", target, weight(w), unit),
        _ => target,
    }
}

/// Text for an emitted event, if it is worth a line
pub fn describe(event: &Event, exercises: &[Exercise], unit: WeightUnit) -> Option<String> {
    let name = |index: usize| {
        exercises
            .get(index)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("exercise {}", index + 1))
    };
    let sets = |index: usize| exercises.get(index).map(|e| e.set_count()).unwrap_or(1);

    let line = match event {
        Event::PhaseChanged {
            phase,
            exercise_index,
            set_index,
        } => {
            let i = *exercise_index;
            let set = format!("set {} of {}", set_index + 1, sets(i));
            match phase {
                Phase::GetReady => format!("Get ready: {} ({})", name(i), set),
                Phase::Active => {
                    let target = exercises
                        .get(i)
                        .map(|e| format!(": {}", prescription(e, unit)))
                        .unwrap_or_default();
                    format!("Go! {}, {}{}", name(i), set, target)
                }
                Phase::Rest => format!("Rest. Up next: {}, {}", name(i), set),
                Phase::DeferredReview => {
                    "Deferred exercises are waiting: 'now <n>', 'drop <n>' or 'skip-all' \
                     ('status' lists them)"
                        .to_string()
                }
                Phase::Complete | Phase::Unavailable => return None,
            }
        }
        Event::SetCompleted { .. } => return None,
        Event::ExerciseCompleted { exercise_index } => {
            format!("Finished {}", name(*exercise_index))
        }
        Event::ExerciseSkipped { exercise_index } => format!("Skipped {}", name(*exercise_index)),
        Event::GroupCompleted { members } => format!(
            "Finished superset: {}",
            members.iter().map(|i| name(*i)).collect::<Vec<_>>().join(", ")
        ),
        Event::ExerciseDeferred { exercise_index } => {
            format!("Deferred {} for later", name(*exercise_index))
        }
        Event::DeferredResolved {
            exercise_index,
            skipped: true,
        } => format!("Dropped {}", name(*exercise_index)),
        Event::DeferredResolved {
            exercise_index,
            skipped: false,
        } => format!("Back to {}", name(*exercise_index)),
        Event::RecommendationReady { .. } => return None,
        Event::Paused => "Paused".to_string(),
        Event::Resumed => "Resumed".to_string(),
        Event::WorkoutComplete { elapsed_secs } => {
            format!("Workout complete in {}", clock_time(*elapsed_secs))
        }
        Event::WorkoutUnavailable => "This workout has no exercises".to_string(),
        Event::SessionClosed => "Progress saved; run the plan again to pick up here".to_string(),
    };
    Some(line)
}

/// "Suggested: 3 x 6 @ 105 kg (reasoning)"
pub fn describe_recommendation(rec: &Recommendation, unit: WeightUnit) -> String {
    let load = if rec.weight > 0.0 {
        format!(" @ {} {}", weight(rec.weight), unit)
    } else {
        String::new()
    };
    let plateau = if rec.plateau { " [plateau]" } else { "" };
    format!(
        "Suggested: {} x {}{}{} ({})",
        rec.sets, rec.reps, load, plateau, rec.reasoning
    )
}

/// Multi-line status for the `status` command
pub fn status(view: &WorkoutView) -> String {
    let mut lines = vec![format!(
        "{} [{}] {}, {}, {}% done, {} elapsed",
        view.workout,
        view.phase,
        view.exercise_label(),
        view.set_label(),
        view.progress_pct,
        clock_time(view.elapsed_secs)
    )];
    if let Some(exercise) = &view.exercise {
        let replay = if view.replay { " (deferred)" } else { "" };
        lines.push(format!("  now: {}{}", exercise.name, replay));
    }
    if let Some(secs) = view.remaining_secs {
        let paused = if view.paused { ", paused" } else { "" };
        lines.push(format!("  countdown: {}{}", clock_time(u64::from(secs)), paused));
    }
    if let Some(superset) = &view.superset {
        lines.push(format!(
            "  superset {}: round {} of {}",
            superset.label,
            superset.round + 1,
            superset.total_rounds
        ));
    }
    if let Some(next) = &view.up_next {
        lines.push(format!("  up next: {}", next));
    }
    let waiting = if view.review.is_empty() {
        &view.deferred
    } else {
        &view.review
    };
    for entry in waiting {
        lines.push(format!(
            "  deferred {}: {}",
            entry.exercise_index + 1,
            entry.name
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
