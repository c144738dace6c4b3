//! Usage and version output.

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("--program")
        .stdout_has("--arg")
        .stdout_has("--kill-on-cancel");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn missing_program_value_is_a_usage_error() {
    cli().args(&["-p"]).code(2).stderr_has("EXEC");
}

#[test]
fn unknown_output_format_is_a_usage_error() {
    let run = cli().args(&["-o", "yaml", "echo hi"]).fails();
    assert_eq!(run.code(), Some(2));
}

#[test]
fn empty_program_is_a_usage_error() {
    cli().args(&["-p", ""]).code(2).stderr_has("must not be empty");
}
