// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! atst-core: plain data shared by the supervisor and the `atst` CLI.

pub mod macros;

pub mod output;
pub mod program;

pub use output::{ErrorKind, Output, OutputKind, StreamSource};
pub use program::{Program, ProgramError};
