// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor entry point and the per-call session.

use atst_core::Program;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::env::SupervisorConfig;
use crate::mux::{self, MergedOutputs, OutputReceiver};
use crate::process::{self, ProcessHandle, Termination};

/// Starts groups of programs concurrently.
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    config: SupervisorConfig,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Launch every program and return immediately.
    ///
    /// Program `i` reports through receiver `i`. Start failures are reported
    /// as error records, never returned. Must be called from within a tokio
    /// runtime.
    pub fn start(&self, programs: impl IntoIterator<Item = Program>) -> Session {
        let tracker = TaskTracker::new();
        let termination = Termination::new(self.config.kill_grace);
        let mut outputs = Vec::new();

        for (index, program) in programs.into_iter().enumerate() {
            let (sink, receiver) = mux::channel(index, program.exec(), self.config.output_buffer);
            outputs.push(receiver);
            tracker.spawn(process::supervise(
                ProcessHandle::new(index, program).in_process_group(self.config.process_group),
                sink,
                tracker.clone(),
                self.config.clone(),
                termination.clone(),
            ));
        }
        // Reader tasks are spawned by the lifecycle tasks, which are still
        // tracked, so closing here cannot release waiters early.
        tracker.close();

        let programs = outputs.len();
        info!(programs, "session started");
        Session { programs, outputs, tracker, termination }
    }
}

/// How [`Session::wait_or_cancel`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every program exited and every stream was drained.
    Completed,
    /// The token fired first; programs keep running.
    Cancelled,
}

/// One call's worth of supervised programs.
///
/// Dropping a session does not stop its programs.
pub struct Session {
    programs: usize,
    outputs: Vec<OutputReceiver>,
    tracker: TaskTracker,
    termination: Termination,
}

impl Session {
    /// Number of programs started, including ones that failed to start.
    pub fn len(&self) -> usize {
        self.programs
    }

    pub fn is_empty(&self) -> bool {
        self.programs == 0
    }

    /// Receiver for program `index`, until the receivers are taken.
    pub fn output(&mut self, index: usize) -> Option<&mut OutputReceiver> {
        self.outputs.get_mut(index)
    }

    /// Take every receiver, in program order. Later calls return nothing.
    pub fn take_outputs(&mut self) -> Vec<OutputReceiver> {
        std::mem::take(&mut self.outputs)
    }

    /// Take every receiver merged into one stream.
    pub fn merged(&mut self) -> MergedOutputs {
        mux::merge(self.take_outputs())
    }

    /// Completes once every program exited and all of its output was
    /// delivered or discarded.
    ///
    /// Idempotent and cancel-safe. Output must be consumed concurrently, or
    /// receivers dropped, for programs to make progress.
    pub async fn wait(&self) {
        self.tracker.wait().await;
    }

    pub fn is_finished(&self) -> bool {
        self.tracker.is_closed() && self.tracker.is_empty()
    }

    /// Like [`wait`](Self::wait) but gives up when `cancel` fires.
    pub async fn wait_or_cancel(&self, cancel: &CancellationToken) -> WaitOutcome {
        tokio::select! {
            biased;
            _ = self.wait() => WaitOutcome::Completed,
            _ = cancel.cancelled() => WaitOutcome::Cancelled,
        }
    }

    /// Ask every program to stop: SIGTERM, then SIGKILL after the grace
    /// period. Output produced meanwhile is still delivered.
    pub fn terminate(&self) {
        if !self.termination.is_requested() {
            info!(programs = self.programs, "terminating session");
        }
        self.termination.request();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
