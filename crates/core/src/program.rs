// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A program: an executable plus its ordered arguments.

use serde::Serialize;
use std::fmt;

/// Errors raised when constructing a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("program executable must not be empty")]
    EmptyExec,
}

/// One unit of work submitted to the supervisor.
///
/// Immutable once constructed. The executable is never empty; arguments are
/// passed to the process verbatim and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    exec: String,
    args: Vec<String>,
}

impl Program {
    pub fn new<I, S>(exec: impl Into<String>, args: I) -> Result<Self, ProgramError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let exec = exec.into();
        if exec.is_empty() {
            return Err(ProgramError::EmptyExec);
        }
        Ok(Self { exec, args: args.into_iter().map(Into::into).collect() })
    }

    /// Build a program from a whole command line split on whitespace.
    ///
    /// No quoting rules apply: `"echo 'a b'"` yields the arguments `'a` and `b'`.
    pub fn parse(command_line: &str) -> Result<Self, ProgramError> {
        let mut words = command_line.split_whitespace();
        let exec = words.next().ok_or(ProgramError::EmptyExec)?;
        Self::new(exec, words)
    }

    pub fn exec(&self) -> &str {
        &self.exec
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exec)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
