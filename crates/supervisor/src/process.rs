// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle of one supervised program.
//!
//! A program moves through three typestates:
//!
//! - [`ProcessHandle`]: not started
//! - [`RunningProcess`]: spawned, owns both output pipes
//! - [`DrainedProcess`]: both pipes read to end-of-stream, only now waitable
//!
//! Waiting on a child before its pipes are drained can truncate output or
//! deadlock on a full pipe buffer. `wait` only exists on `DrainedProcess`,
//! and the only way to get one is [`RunningProcess::drain`].

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use atst_core::{OutputKind, Program, StreamSource};
use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn, Instrument};

use crate::env::SupervisorConfig;
use crate::error::{ExitFailure, ProcessError};
use crate::lines::LineReader;
use crate::mux::OutputSink;

// ---------------------------------------------------------------------------
// Termination requests
// ---------------------------------------------------------------------------

/// Opt-in request to stop every child of a session.
///
/// Children first get SIGTERM (on unix), then SIGKILL once `grace` elapses.
/// Nothing terminates children unless [`Termination::request`] is called.
#[derive(Debug, Clone)]
pub struct Termination {
    token: CancellationToken,
    grace: Duration,
}

impl Termination {
    pub fn new(grace: Duration) -> Self {
        Self { token: CancellationToken::new(), grace }
    }

    pub fn request(&self) {
        self.token.cancel();
    }

    pub fn is_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    async fn requested(&self) {
        self.token.cancelled().await;
    }
}

// ---------------------------------------------------------------------------
// Not started
// ---------------------------------------------------------------------------

/// A program bound to its index, not yet started.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    index: usize,
    program: Program,
    process_group: bool,
}

impl ProcessHandle {
    pub fn new(index: usize, program: Program) -> Self {
        Self { index, program, process_group: false }
    }

    /// Start the program as the leader of a new process group (unix only).
    ///
    /// Termination then signals the whole group, so children the program
    /// forked cannot keep its pipes open. Grouped programs no longer receive
    /// the terminal's interrupt directly.
    pub fn in_process_group(mut self, enabled: bool) -> Self {
        self.process_group = enabled;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Spawn the program with stdout and stderr piped and stdin closed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> Result<RunningProcess, ProcessError> {
        let command = self.program.exec().to_string();

        let mut process = Command::new(self.program.exec());
        process.args(self.program.args());
        process.stdin(Stdio::null());
        process.stdout(Stdio::piped());
        process.stderr(Stdio::piped());
        #[cfg(unix)]
        if self.process_group {
            process.process_group(0);
        }

        let mut child = process
            .spawn()
            .map_err(|source| ProcessError::Start { command: command.clone(), source })?;

        let group = if self.process_group { child.id() } else { None };
        match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => {
                Ok(RunningProcess { command, child, group, stdout, stderr })
            }
            (stdout, _) => {
                let stream =
                    if stdout.is_none() { StreamSource::Stdout } else { StreamSource::Stderr };
                // A child whose output cannot be drained is never handed out.
                force_kill(&mut child, &command, group);
                Err(ProcessError::Spawn { command, stream })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// A spawned program that still owns both of its output pipes.
pub struct RunningProcess {
    command: String,
    child: Child,
    /// Process group id when the child leads its own group.
    group: Option<u32>,
    stdout: ChildStdout,
    stderr: ChildStderr,
}

impl RunningProcess {
    /// OS process id, `None` once the child has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Forward both pipes into `sink`, one reader task per pipe, and return
    /// once both reached end-of-stream.
    ///
    /// Reader tasks are spawned on `tracker`. If `termination` is requested
    /// meanwhile, the child is signaled but its pipes are still drained.
    pub async fn drain(
        self,
        sink: &OutputSink,
        tracker: &TaskTracker,
        max_line_bytes: usize,
        termination: &Termination,
    ) -> DrainedProcess {
        let RunningProcess { command, mut child, group, stdout, stderr } = self;

        let stdout_task = tracker.spawn(forward_lines(
            stdout,
            StreamSource::Stdout,
            sink.clone(),
            max_line_bytes,
        ));
        let stderr_task = tracker.spawn(forward_lines(
            stderr,
            StreamSource::Stderr,
            sink.clone(),
            max_line_bytes,
        ));

        let readers = [(StreamSource::Stdout, stdout_task), (StreamSource::Stderr, stderr_task)];
        let drained = async move {
            for (stream, task) in readers {
                if let Err(e) = task.await {
                    warn!(%stream, error = %e, "reader task failed");
                }
            }
        };
        tokio::pin!(drained);

        tokio::select! {
            biased;
            _ = &mut drained => {}
            _ = termination.requested() => {
                signal_terminate(&mut child, &command, group);
                if tokio::time::timeout(termination.grace(), &mut drained).await.is_err() {
                    force_kill(&mut child, &command, group);
                    drained.await;
                }
            }
        }

        debug!("streams drained");
        DrainedProcess { command, child, group }
    }
}

// ---------------------------------------------------------------------------
// Drained
// ---------------------------------------------------------------------------

/// A program whose output pipes have both reached end-of-stream.
pub struct DrainedProcess {
    command: String,
    child: Child,
    group: Option<u32>,
}

impl DrainedProcess {
    /// Wait for the child to exit.
    ///
    /// A non-zero exit or a fatal signal is reported as [`ProcessError::Exit`].
    pub async fn wait(mut self, termination: &Termination) -> Result<ExitStatus, ProcessError> {
        let waited = tokio::select! {
            biased;
            status = self.child.wait() => Some(status),
            _ = termination.requested() => None,
        };

        let status = match waited {
            Some(status) => status,
            None => {
                signal_terminate(&mut self.child, &self.command, self.group);
                match tokio::time::timeout(termination.grace(), self.child.wait()).await {
                    Ok(status) => status,
                    Err(_) => {
                        force_kill(&mut self.child, &self.command, self.group);
                        self.child.wait().await
                    }
                }
            }
        };

        let status =
            status.map_err(|source| ProcessError::Wait { command: self.command.clone(), source })?;
        match ExitFailure::from_status(status) {
            None => Ok(status),
            Some(failure) => Err(ProcessError::Exit { command: self.command, status: failure }),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-program task
// ---------------------------------------------------------------------------

/// Run one program to completion, reporting everything through `sink`.
///
/// Start failures end the program with a single error record. Otherwise every
/// line is forwarded first and the exit outcome is reported last.
pub(crate) async fn supervise(
    handle: ProcessHandle,
    sink: OutputSink,
    tracker: TaskTracker,
    config: SupervisorConfig,
    termination: Termination,
) {
    let span = tracing::info_span!(
        "program",
        index = handle.index(),
        command = %handle.program().exec(),
    );

    async move {
        let running = match handle.start() {
            Ok(running) => running,
            Err(e) => {
                warn!(error = %e, "program did not start");
                sink.failure(&e).await;
                return;
            }
        };
        debug!(pid = ?running.id(), args = ?handle.program().args(), "program started");

        let drained = running.drain(&sink, &tracker, config.max_line_bytes, &termination).await;

        match drained.wait(&termination).await {
            Ok(_) => {
                info!("program exited");
                if config.report_exit {
                    sink.send(OutputKind::Exit, "exited").await;
                }
            }
            Err(e) => {
                warn!(error = %e, "program failed");
                sink.failure(&e).await;
            }
        }
    }
    .instrument(span)
    .await
}

/// Forward every line of one pipe into `sink`, then drain whatever is left.
async fn forward_lines<R>(stream: R, source: StreamSource, sink: OutputSink, max_line_bytes: usize)
where
    R: AsyncRead + Unpin,
{
    let mut reader = LineReader::new(stream, max_line_bytes);
    let mut delivering = true;

    loop {
        match reader.next_line().await {
            Ok(Some(line)) => {
                if delivering && !sink.line(source, line).await {
                    debug!(%source, "receiver dropped, discarding output");
                    delivering = false;
                }
            }
            Ok(None) => return,
            Err(e) => {
                let err = ProcessError::Read {
                    command: sink.command().to_string(),
                    stream: source,
                    source: e,
                };
                warn!(error = %err, "stream read failed");
                if delivering {
                    sink.failure(&err).await;
                }
                break;
            }
        }
    }

    if let Err(e) = reader.discard_remaining().await {
        debug!(%source, error = %e, "failed to discard remaining output");
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Send SIGTERM to the child, or to its whole process group.
#[cfg(unix)]
fn signal_terminate(child: &mut Child, command: &str, group: Option<u32>) {
    use nix::sys::signal::{kill, killpg, Signal};

    if let Some(pgid) = group.and_then(to_pid) {
        match killpg(pgid, Signal::SIGTERM) {
            Ok(()) => info!(command, pgid = pgid.as_raw(), "sent SIGTERM to process group"),
            Err(e) => debug!(command, pgid = pgid.as_raw(), error = %e, "SIGTERM to group failed"),
        }
        return;
    }

    let Some(pid) = child.id() else {
        return;
    };
    let Some(pid) = to_pid(pid) else {
        force_kill(child, command, group);
        return;
    };
    match kill(pid, Signal::SIGTERM) {
        Ok(()) => info!(command, pid = pid.as_raw(), "sent SIGTERM"),
        Err(e) => debug!(command, pid = pid.as_raw(), error = %e, "SIGTERM failed"),
    }
}

#[cfg(not(unix))]
fn signal_terminate(child: &mut Child, command: &str, group: Option<u32>) {
    force_kill(child, command, group);
}

/// SIGKILL the process group, if any, then the child itself.
fn force_kill(child: &mut Child, command: &str, group: Option<u32>) {
    #[cfg(unix)]
    if let Some(pgid) = group.and_then(to_pid) {
        use nix::sys::signal::{killpg, Signal};
        if let Err(e) = killpg(pgid, Signal::SIGKILL) {
            debug!(command, pgid = pgid.as_raw(), error = %e, "SIGKILL to group failed");
        }
    }
    #[cfg(not(unix))]
    let _ = group;

    match child.start_kill() {
        Ok(()) => info!(command, "killed"),
        Err(e) => debug!(command, error = %e, "kill failed"),
    }
}

#[cfg(unix)]
fn to_pid(raw: u32) -> Option<nix::unistd::Pid> {
    i32::try_from(raw).ok().map(nix::unistd::Pid::from_raw)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
