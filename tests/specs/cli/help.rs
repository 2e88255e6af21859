//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.gw()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("plan")
        .stdout_has("advise")
        .stdout_has("history")
        .stdout_has("resume")
        .stdout_has("completions");
}

#[test]
fn version_names_binary() {
    let temp = Project::empty();

    temp.gw().args(&["--version"]).passes().stdout_has("gw ");
}

#[test]
fn completions_are_generated_for_bash() {
    let temp = Project::empty();

    temp.gw()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("_gw()");
}
