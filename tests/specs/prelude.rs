//! Shared helpers for CLI specs
//!
//! A [`Project`] is a scratch directory holding plan files and a private
//! state directory, so specs never touch the real data dir.

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Plan with a single one-set exercise
pub const ONE_SET_PLAN: &str = r#"
name = "Quick"

[[exercises]]
name = "Push Up"
sets = 1
reps = 10
"#;

/// Two rep exercises, one set each
pub const LEG_DAY_PLAN: &str = r#"
name = "Leg Day"

[[exercises]]
id = "squat"
name = "Squat"
sets = 1
reps = 5
weight = 100.0

[[exercises]]
id = "lunge"
name = "Lunge"
sets = 1
reps = "8-12"
"#;

/// No get-ready countdown, so scripted input lands in an active set
pub const FAST_CONFIG: &str = r#"
get_ready = "0s"
"#;

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
        self
    }

    /// Write the engine config in the state directory
    pub fn config(&self, content: &str) -> &Self {
        self.file("state/config.toml", content)
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).unwrap()
    }

    pub fn gw(&self) -> CliBuilder {
        let mut cmd = Command::cargo_bin("gw").unwrap();
        cmd.current_dir(self.path())
            .arg("--state-dir")
            .arg(self.state_dir())
            .env_remove("GW_LOG")
            .timeout(Duration::from_secs(20));
        CliBuilder { cmd }
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn passes(mut self) -> RunAssert {
        RunAssert {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> RunAssert {
        RunAssert {
            assert: self.cmd.assert().failure(),
        }
    }
}

pub struct RunAssert {
    assert: Assert,
}

impl RunAssert {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.assert.get_output().stdout).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}
