// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! atst-supervisor: run programs concurrently and multiplex their output.
//!
//! [`Supervisor::start`] launches every program at once and hands back a
//! [`Session`] with one [`OutputReceiver`] per program. Each program is
//! driven by one lifecycle task plus one reader task per stream; all of them
//! are tracked so [`Session::wait`] completes only after every process has
//! exited and every line has been delivered.

pub mod cancel;
pub mod env;
pub mod error;
pub mod lines;
pub mod mux;
pub mod process;
pub mod session;

pub use cancel::{CancellationController, Interrupt};
pub use env::SupervisorConfig;
pub use error::{ExitFailure, ProcessError, ReadError};
pub use lines::LineReader;
pub use mux::{merge, MergedOutputs, OutputReceiver, OutputSink};
pub use process::{DrainedProcess, ProcessHandle, RunningProcess, Termination};
pub use session::{Session, Supervisor, WaitOutcome};

pub use tokio_util::sync::CancellationToken;
