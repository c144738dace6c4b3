// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic logging to stderr.

use tracing_subscriber::EnvFilter;

/// Filter directive for `-v` repeated `verbose` times.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `ATST_LOG` when set and non-empty, otherwise the `-v` level.
pub fn filter_directive(verbose: u8) -> String {
    std::env::var("ATST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| level_for(verbose).to_string())
}

/// Install the global subscriber. Program output owns stdout, so logs go to stderr.
pub fn init(verbose: u8) {
    let directive = filter_directive(verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("atst: invalid ATST_LOG directive {directive:?}: {e}");
        EnvFilter::new(level_for(verbose))
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(e) = installed {
        eprintln!("atst: failed to install logger: {e}");
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
