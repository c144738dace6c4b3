// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Cli {
    Cli::parse_args_from(std::iter::once("atst").chain(args.iter().copied())).unwrap()
}

fn rendered(args: &[&str]) -> Vec<String> {
    parse(args).programs().unwrap().iter().map(ToString::to_string).collect()
}

#[test]
fn args_attach_to_the_preceding_program() {
    let programs = rendered(&["-p", "echo", "-a", "hello", "-a", "world", "-p", "ls", "-a", "/tmp"]);
    assert_eq!(programs, ["echo hello world", "ls /tmp"]);
}

#[test]
fn program_without_args() {
    let programs = parse(&["--program", "date"]).programs().unwrap();
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].exec(), "date");
    assert!(programs[0].args().is_empty());
}

#[test]
fn arg_values_may_start_with_a_dash() {
    let programs = rendered(&["-p", "ls", "-a", "-l", "-a", "--all"]);
    assert_eq!(programs, ["ls -l --all"]);
}

#[test]
fn args_before_any_program_are_ignored() {
    let programs = rendered(&["-a", "stray", "-p", "echo", "-a", "kept"]);
    assert_eq!(programs, ["echo kept"]);
}

#[test]
fn positional_commands_are_split_on_whitespace() {
    let programs = parse(&["echo  hello   world", "date"]).programs().unwrap();
    assert_eq!(programs[0].exec(), "echo");
    assert_eq!(programs[0].args(), ["hello", "world"]);
    assert_eq!(programs[1].exec(), "date");
}

#[test]
fn flagged_and_positional_programs_keep_command_line_order() {
    let programs = rendered(&["uname -a", "-p", "echo", "-a", "x", "date"]);
    assert_eq!(programs, ["uname -a", "echo x", "date"]);
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
)]
fn blank_commands_are_skipped(command: &str) {
    assert!(parse(&[command]).programs().unwrap().is_empty());
}

#[test]
fn empty_program_flag_is_rejected() {
    let cli = parse(&["-p", ""]);
    assert_eq!(cli.programs().unwrap_err(), ProgramError::EmptyExec);
}

#[test]
fn no_arguments_means_no_programs() {
    let cli = parse(&[]);
    assert!(cli.programs().unwrap().is_empty());
    assert_eq!(cli.output, OutputFormat::Text);
    assert!(!cli.show_exit);
    assert!(!cli.kill_on_cancel);
    assert_eq!(cli.verbose, 0);
}

#[test]
fn flags_parse() {
    let cli = parse(&["-o", "json", "--show-exit", "--kill-on-cancel", "-vv"]);
    assert_eq!(cli.output, OutputFormat::Json);
    assert!(cli.show_exit);
    assert!(cli.kill_on_cancel);
    assert_eq!(cli.verbose, 2);
}

#[parameterized(
    program_missing_value = { &["-p"] },
    arg_missing_value = { &["-p", "echo", "-a"] },
    unknown_format = { &["-o", "yaml"] },
)]
fn usage_errors(args: &[&str]) {
    let err = Cli::parse_args_from(std::iter::once("atst").chain(args.iter().copied())).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
