// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.
//!
//! `-a/--arg` values attach to the closest preceding `-p/--program`, so the
//! parsed struct also records where on the command line each value appeared.

use atst_core::{Program, ProgramError};
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing::warn;

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "atst",
    version,
    about = "Run programs concurrently and tag every line of their output",
    styles = crate::color::styles(),
)]
pub struct Cli {
    /// Start a new program
    #[arg(short = 'p', long = "program", value_name = "EXEC", action = ArgAction::Append)]
    pub program: Vec<String>,

    /// Append an argument to the most recent --program
    #[arg(
        short = 'a',
        long = "arg",
        value_name = "ARG",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub arg: Vec<String>,

    /// Whole command lines, split on whitespace
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    pub output: OutputFormat,

    /// Also report successful exits
    #[arg(long)]
    pub show_exit: bool,

    /// On the first interrupt, terminate the programs and wait for them
    #[arg(long)]
    pub kill_on_cancel: bool,

    /// Log more (repeatable); ATST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(skip)]
    positions: Positions,
}

/// Command-line indices of each multi-valued argument's values.
#[derive(Debug, Default)]
struct Positions {
    program: Vec<usize>,
    arg: Vec<usize>,
    commands: Vec<usize>,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_env() -> Result<Self, clap::Error> {
        Self::parse_args_from(std::env::args_os())
    }

    pub fn parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_matches(&Self::command().try_get_matches_from(args)?)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;
        let indices = |id: &str| -> Vec<usize> {
            matches.indices_of(id).map(Iterator::collect).unwrap_or_default()
        };
        cli.positions = Positions {
            program: indices("program"),
            arg: indices("arg"),
            commands: indices("commands"),
        };
        Ok(cli)
    }

    /// Programs in command-line order.
    ///
    /// `--arg` values given before any `--program` are dropped with a warning.
    /// Blank `COMMAND` strings are skipped.
    pub fn programs(&self) -> Result<Vec<Program>, ProgramError> {
        let mut flagged: Vec<(usize, &str, Vec<&str>)> = self
            .program
            .iter()
            .zip(&self.positions.program)
            .map(|(exec, &position)| (position, exec.as_str(), Vec::new()))
            .collect();

        let mut stray = Vec::new();
        for (arg, &position) in self.arg.iter().zip(&self.positions.arg) {
            match flagged.iter_mut().rev().find(|(start, ..)| *start < position) {
                Some((_, _, args)) => args.push(arg.as_str()),
                None => stray.push(arg.as_str()),
            }
        }
        if !stray.is_empty() {
            warn!(args = ?stray, "ignoring --arg values given before any --program");
        }

        let mut ordered = Vec::with_capacity(flagged.len() + self.commands.len());
        for (position, exec, args) in flagged {
            ordered.push((position, Program::new(exec, args)?));
        }
        for (line, &position) in self.commands.iter().zip(&self.positions.commands) {
            if line.trim().is_empty() {
                continue;
            }
            ordered.push((position, Program::parse(line)?));
        }
        ordered.sort_by_key(|(position, _)| *position);

        Ok(ordered.into_iter().map(|(_, program)| program).collect())
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
