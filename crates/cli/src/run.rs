// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start the programs, print their output, and pick the exit code.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use atst_core::Program;
use atst_supervisor::{
    CancellationController, CancellationToken, MergedOutputs, Session, Supervisor,
    SupervisorConfig, WaitOutcome,
};
use futures_util::StreamExt;
use tracing::{debug, info};

use crate::args::Cli;
use crate::exit_error::{ExitError, EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_USAGE};
use crate::output::Printer;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let programs = cli.programs().map_err(|e| ExitError::new(EXIT_USAGE, e.to_string()))?;
    let config = SupervisorConfig::from_env()
        .report_exit(cli.show_exit)
        .process_group(cli.kill_on_cancel);

    let controller = Arc::new(CancellationController::new());
    let force = CancellationToken::new();
    let listener = crate::signal::spawn_listener(Arc::clone(&controller), force.clone());

    let result = tokio::select! {
        biased;
        _ = force.cancelled() => Err(ExitError::silent(EXIT_INTERRUPTED).into()),
        result = supervise(programs, config, &cli, &controller) => result,
    };
    listener.abort();
    result
}

/// How the print loop ended.
enum Printed {
    /// Every record was printed.
    All,
    /// The first interrupt arrived.
    Cancelled,
    /// Stdout went away; remaining records are discarded but still decide
    /// the exit code.
    StdoutClosed,
}

async fn supervise(
    programs: Vec<Program>,
    config: SupervisorConfig,
    cli: &Cli,
    controller: &CancellationController,
) -> anyhow::Result<()> {
    if programs.is_empty() {
        debug!("no programs given");
        return Ok(());
    }

    let mut session = Supervisor::new(config).start(programs);
    let mut merged = session.merged();
    let mut printer = Printer::new(io::stdout(), cli.output, crate::color::should_colorize());
    let mut failed = false;
    let cancel = controller.token();

    let printed = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break Printed::Cancelled,
            next = merged.next() => match next {
                None => break Printed::All,
                Some(output) => {
                    failed |= output.is_error();
                    if let Err(e) = printer.print(&output) {
                        if e.kind() != io::ErrorKind::BrokenPipe {
                            return Err(e).context("failed to write output");
                        }
                        break Printed::StdoutClosed;
                    }
                }
            },
        }
    };

    match printed {
        Printed::All => {
            if session.wait_or_cancel(&cancel).await == WaitOutcome::Cancelled {
                return Err(ExitError::silent(EXIT_INTERRUPTED).into());
            }
        }
        Printed::StdoutClosed => {
            debug!("stdout closed, discarding remaining output");
            controller.begin_shutdown();
            failed |= discard(merged).await;
            session.wait().await;
        }
        Printed::Cancelled => {
            if cli.kill_on_cancel {
                terminate(&session, merged, &mut printer).await?;
            } else {
                info!(programs = session.len(), "leaving programs running");
            }
            return Err(ExitError::silent(EXIT_INTERRUPTED).into());
        }
    }

    if failed {
        return Err(ExitError::silent(EXIT_FAILURE).into());
    }
    Ok(())
}

/// Drain `merged` without printing. Returns whether any record was an error.
async fn discard(mut merged: MergedOutputs) -> bool {
    let mut failed = false;
    while let Some(output) = merged.next().await {
        failed |= output.is_error();
    }
    failed
}

/// Stop every program and print whatever they emit on the way out.
async fn terminate<W: Write>(
    session: &Session,
    mut merged: MergedOutputs,
    printer: &mut Printer<W>,
) -> anyhow::Result<()> {
    session.terminate();

    let mut printing = true;
    while let Some(output) = merged.next().await {
        if printing {
            if let Err(e) = printer.print(&output) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e).context("failed to write output");
                }
                printing = false;
            }
        }
    }
    session.wait().await;
    Ok(())
}
