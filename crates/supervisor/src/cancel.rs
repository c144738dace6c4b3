// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two-stage interrupt handling for callers.
//!
//! The first interrupt cancels the shared token so the caller can stop
//! waiting and shut down. Any later interrupt, or one arriving after
//! shutdown began, asks for an immediate exit.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// What the caller should do about an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Stop waiting and shut down gracefully.
    Cancel,
    /// Exit now.
    Force,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Cancelled,
    ShuttingDown,
}

#[derive(Debug)]
pub struct CancellationController {
    token: CancellationToken,
    phase: Mutex<Phase>,
}

impl Default for CancellationController {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationController {
    pub fn new() -> Self {
        Self { token: CancellationToken::new(), phase: Mutex::new(Phase::Running) }
    }

    /// Token cancelled by the first interrupt.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn interrupt(&self) -> Interrupt {
        let mut phase = self.phase.lock();
        match *phase {
            Phase::Running => {
                *phase = Phase::Cancelled;
                self.token.cancel();
                Interrupt::Cancel
            }
            Phase::Cancelled | Phase::ShuttingDown => Interrupt::Force,
        }
    }

    /// From now on every interrupt is [`Interrupt::Force`].
    pub fn begin_shutdown(&self) {
        *self.phase.lock() = Phase::ShuttingDown;
    }
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
