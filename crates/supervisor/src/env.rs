// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access and supervisor configuration.

use std::time::Duration;

/// Default bound on a single line's content, excluding its terminator.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// Default capacity of each per-process output channel.
pub const DEFAULT_OUTPUT_BUFFER: usize = 64;

/// Upper bound on each per-process output channel's capacity.
pub const MAX_OUTPUT_BUFFER: usize = 1 << 20;

/// Default grace period between SIGTERM and SIGKILL when terminating.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(3);

/// Maximum line length: `ATST_MAX_LINE_BYTES`, clamped to at least 1.
pub fn max_line_bytes() -> usize {
    std::env::var("ATST_MAX_LINE_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_LINE_BYTES)
        .max(1)
}

/// Per-process channel capacity: `ATST_OUTPUT_BUFFER`, clamped to
/// `1..=MAX_OUTPUT_BUFFER`.
pub fn output_buffer() -> usize {
    std::env::var("ATST_OUTPUT_BUFFER")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_OUTPUT_BUFFER)
        .clamp(1, MAX_OUTPUT_BUFFER)
}

/// Termination grace period: `ATST_KILL_GRACE_MS`.
pub fn kill_grace() -> Duration {
    std::env::var("ATST_KILL_GRACE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_KILL_GRACE)
}

/// Tunables for one [`Supervisor`](crate::Supervisor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Lines longer than this are reported as read errors.
    pub max_line_bytes: usize,
    /// Records buffered per process before producers block, clamped to
    /// `1..=MAX_OUTPUT_BUFFER` when channels are built.
    pub output_buffer: usize,
    /// Wait between SIGTERM and SIGKILL after [`Session::terminate`](crate::Session::terminate).
    pub kill_grace: Duration,
    /// Emit an `exit` record when a program exits successfully.
    pub report_exit: bool,
    /// Start each program in its own process group (unix only), so that
    /// termination also reaches the processes it forked.
    pub process_group: bool,
}

impl SupervisorConfig {
    /// Defaults overridden by `ATST_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            max_line_bytes: max_line_bytes(),
            output_buffer: output_buffer(),
            kill_grace: kill_grace(),
            report_exit: false,
            process_group: false,
        }
    }

    atst_core::setters! {
        set {
            max_line_bytes: usize,
            output_buffer: usize,
            kill_grace: Duration,
            report_exit: bool,
            process_group: bool,
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
            kill_grace: DEFAULT_KILL_GRACE,
            report_exit: false,
            process_group: false,
        }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
