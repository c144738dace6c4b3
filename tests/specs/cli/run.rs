//! Running programs and reporting their output.

use crate::prelude::*;

#[test]
fn no_programs_prints_nothing() {
    cli().passes().stdout_eq("");
}

#[test]
fn flagged_program_with_args() {
    cli().args(&["-p", "echo", "-a", "hello", "-a", "world"]).passes().stdout_eq("[0]: hello world\n");
}

#[test]
fn positional_command_line() {
    cli().args(&["echo hi there"]).passes().stdout_eq("[0]: hi there\n");
}

#[test]
fn every_program_gets_its_own_index() {
    let run = cli().args(&["echo zero", "echo one", "-p", "echo", "-a", "two"]).passes();

    let mut lines = run.stdout_lines();
    lines.sort();
    assert_eq!(lines, ["[0]: zero", "[1]: one", "[2]: two"]);
}

#[test]
fn stderr_lines_are_reported_too() {
    cli()
        .args(&["-p", "sh", "-a", "-c", "-a", "echo oops >&2"])
        .passes()
        .stdout_eq("[0]: oops\n");
}

#[test]
fn missing_executable_fails_without_stopping_others() {
    cli()
        .args(&["atst-definitely-missing", "echo still-here"])
        .code(1)
        .stdout_has("[0]: failed to start `atst-definitely-missing`")
        .stdout_has("[1]: still-here");
}

#[test]
fn abnormal_exit_is_reported_after_output() {
    let run = cli().args(&["-p", "sh", "-a", "-c", "-a", "echo first; exit 1"]).code(1);

    assert_eq!(
        run.stdout_lines(),
        ["[0]: first", "[0]: `sh` exited abnormally: exit status 1"]
    );
}

#[test]
fn show_exit_reports_successful_exits() {
    cli().args(&["--show-exit", "echo done"]).passes().stdout_eq("[0]: done\n[0]: exited\n");
}

#[test]
fn long_lines_are_read_errors() {
    cli()
        .env("ATST_MAX_LINE_BYTES", "4")
        .args(&["echo ok", "echo toolong"])
        .code(1)
        .stdout_has("[0]: ok")
        .stdout_has("[1]: failed to read stdout of `echo`: line exceeds 4 bytes")
        .stdout_lacks("[1]: toolong");
}

#[test]
fn sleeping_program_is_waited_for() {
    let started = std::time::Instant::now();
    cli().args(&["sleep 0.5", "echo quick"]).passes().stdout_eq("[1]: quick\n");
    assert!(started.elapsed() >= std::time::Duration::from_millis(500));
}

#[test]
fn verbose_logs_go_to_stderr() {
    let run = cli().args(&["-vv", "echo logged"]).passes().stdout_eq("[0]: logged\n");
    assert!(run.stderr().contains("session started"), "{}", run.stderr());
}
