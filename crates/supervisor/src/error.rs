// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-program failure types.
//!
//! None of these escalate past the program that produced them: the
//! supervisor turns each one into an error [`Output`](atst_core::Output)
//! record tagged with the program's index.

use atst_core::{ErrorKind, StreamSource};
use std::fmt;
use std::process::ExitStatus;

/// Errors that end or interrupt one supervised program.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// A standard stream handle was missing after spawning.
    #[error("failed to capture {stream} of `{command}`")]
    Spawn { command: String, stream: StreamSource },

    /// The executable could not be started.
    #[error("failed to start `{command}`: {source}")]
    Start { command: String, source: std::io::Error },

    /// Reading one of the program's streams failed.
    #[error("failed to read {stream} of `{command}`: {source}")]
    Read { command: String, stream: StreamSource, source: ReadError },

    /// The program exited non-zero or was killed by a signal.
    #[error("`{command}` exited abnormally: {status}")]
    Exit { command: String, status: ExitFailure },

    /// Waiting on the program failed.
    #[error("failed to wait on `{command}`: {source}")]
    Wait { command: String, source: std::io::Error },
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::Spawn { .. } => ErrorKind::Spawn,
            ProcessError::Start { .. } => ErrorKind::Start,
            ProcessError::Read { .. } => ErrorKind::Read,
            ProcessError::Exit { .. } | ProcessError::Wait { .. } => ErrorKind::Runtime,
        }
    }
}

/// Errors produced by [`LineReader`](crate::LineReader).
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A non-successful exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitFailure {
    Code(i32),
    Signal(i32),
    /// Neither an exit code nor a signal was reported.
    Unknown,
}

impl ExitFailure {
    /// Classify an exit status; `None` when the process succeeded.
    pub fn from_status(status: ExitStatus) -> Option<Self> {
        if status.success() {
            return None;
        }
        if let Some(code) = status.code() {
            return Some(ExitFailure::Code(code));
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Some(ExitFailure::Signal(signal));
            }
        }
        Some(ExitFailure::Unknown)
    }
}

impl fmt::Display for ExitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitFailure::Code(code) => write!(f, "exit status {code}"),
            ExitFailure::Signal(signal) => write!(f, "terminated by signal {signal}"),
            ExitFailure::Unknown => f.write_str("unknown exit status"),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
