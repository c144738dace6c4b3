// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output records emitted by supervised programs.
//!
//! Every record carries the 0-based index of the program that produced it.
//! Ordinary lines and failure descriptions share the same shape; `kind`
//! tells them apart.

use serde::Serialize;

/// Which standard stream a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSource {
    Stdout,
    Stderr,
}

crate::simple_display! {
    StreamSource {
        Stdout => "stdout",
        Stderr => "stderr",
    }
}

/// Failure taxonomy for a single program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Standard stream handles could not be acquired.
    Spawn,
    /// The executable could not be started (missing, not executable, ...).
    Start,
    /// Reading one of the streams failed, e.g. a line exceeded the bound.
    Read,
    /// The process exited non-zero, was signaled, or could not be waited on.
    Runtime,
}

crate::simple_display! {
    ErrorKind {
        Spawn => "spawn",
        Start => "start",
        Read => "read",
        Runtime => "runtime",
    }
}

/// Classification of an [`Output`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Stdout,
    Stderr,
    /// Successful exit notice (only when exit reporting is enabled).
    Exit,
    Error(ErrorKind),
}

impl OutputKind {
    pub fn is_error(&self) -> bool {
        matches!(self, OutputKind::Error(_))
    }
}

impl From<StreamSource> for OutputKind {
    fn from(source: StreamSource) -> Self {
        match source {
            StreamSource::Stdout => OutputKind::Stdout,
            StreamSource::Stderr => OutputKind::Stderr,
        }
    }
}

impl From<ErrorKind> for OutputKind {
    fn from(kind: ErrorKind) -> Self {
        OutputKind::Error(kind)
    }
}

crate::simple_display! {
    OutputKind {
        Stdout => "stdout",
        Stderr => "stderr",
        Exit => "exit",
        Error(..) => "error",
    }
}

/// One attributed unit of output: a text line or a failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    /// Executable of the originating program.
    pub command: String,
    /// Position of the originating program in the submitted list.
    pub index: usize,
    pub kind: OutputKind,
    /// Line text without its terminator, or a failure description.
    pub msg: String,
}

impl Output {
    pub fn new(
        index: usize,
        command: impl Into<String>,
        kind: impl Into<OutputKind>,
        msg: impl Into<String>,
    ) -> Self {
        Self { command: command.into(), index, kind: kind.into(), msg: msg.into() }
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
