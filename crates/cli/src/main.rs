// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! atst: run programs concurrently and tag every line of their output.

mod args;
mod color;
mod exit_error;
mod logging;
mod output;
mod run;
mod signal;

use exit_error::ExitError;

#[tokio::main]
async fn main() {
    let cli = match args::Cli::parse_env() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    logging::init(cli.verbose);

    if let Err(e) = run::run(cli).await {
        let code = match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("atst: {}", exit.message);
                }
                exit.code
            }
            None => {
                eprintln!("atst: {e:#}");
                exit_error::EXIT_FAILURE
            }
        };
        std::process::exit(code);
    }
}
