// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for running the `atst` binary.

use std::path::PathBuf;
use std::time::Duration;

/// Path of the built `atst` binary.
pub fn atst_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("atst")
}

/// Start building an `atst` invocation with a clean, colorless environment.
pub fn cli() -> CliBuilder {
    let mut cmd = assert_cmd::Command::new(atst_bin());
    cmd.env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("ATST_LOG")
        .env_remove("ATST_MAX_LINE_BYTES")
        .env_remove("ATST_OUTPUT_BUFFER")
        .env_remove("ATST_KILL_GRACE_MS")
        .timeout(Duration::from_secs(30));
    CliBuilder { cmd }
}

pub struct CliBuilder {
    cmd: assert_cmd::Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require exit code 0.
    pub fn passes(self) -> RunAssert {
        self.code(0)
    }

    /// Run and require a non-zero exit code.
    pub fn fails(mut self) -> RunAssert {
        let run = RunAssert::from(self.cmd.output().unwrap());
        assert!(run.code() != Some(0), "expected failure\n{}", run.describe());
        run
    }

    /// Run and require a specific exit code.
    pub fn code(mut self, code: i32) -> RunAssert {
        let run = RunAssert::from(self.cmd.output().unwrap());
        assert_eq!(run.code(), Some(code), "unexpected exit code\n{}", run.describe());
        run
    }
}

pub struct RunAssert {
    output: std::process::Output,
}

impl From<std::process::Output> for RunAssert {
    fn from(output: std::process::Output) -> Self {
        Self { output }
    }
}

impl RunAssert {
    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout().lines().map(str::to_string).collect()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout lacks {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout().contains(needle), "stdout has {needle:?}\n{}", self.describe());
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout(), expected, "\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr lacks {needle:?}\n{}", self.describe());
        self
    }

    fn describe(&self) -> String {
        format!(
            "status: {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            self.output.status,
            self.stdout(),
            self.stderr()
        )
    }
}
