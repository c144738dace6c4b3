// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feeds SIGINT (and SIGTERM on unix) into the cancellation controller.

use std::sync::Arc;

use atst_supervisor::{CancellationController, CancellationToken, Interrupt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Listen for interrupts until aborted.
///
/// The first interrupt cancels the controller's token. A forced interrupt
/// cancels `force` instead; the caller is expected to exit right away.
pub fn spawn_listener(
    controller: Arc<CancellationController>,
    force: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let (mut sigint, mut sigterm) =
                match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
                    (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
                    (Err(e), _) | (_, Err(e)) => {
                        warn!(error = %e, "failed to install signal handlers");
                        return;
                    }
                };
            loop {
                let name = tokio::select! {
                    Some(()) = sigint.recv() => "SIGINT",
                    Some(()) = sigterm.recv() => "SIGTERM",
                    else => return,
                };
                handle(&controller, &force, name);
            }
        }
        #[cfg(not(unix))]
        {
            while tokio::signal::ctrl_c().await.is_ok() {
                handle(&controller, &force, "ctrl-c");
            }
        }
    })
}

fn handle(controller: &CancellationController, force: &CancellationToken, signal: &str) {
    match controller.interrupt() {
        Interrupt::Cancel => info!(signal, "interrupted, shutting down"),
        Interrupt::Force => {
            warn!(signal, "interrupted again, exiting now");
            force.cancel();
        }
    }
}
