//! Interrupt handling and closed output.

#![cfg(unix)]

use crate::prelude::*;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

fn spawn_atst(args: &[&str]) -> Child {
    Command::new(atst_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env("ATST_KILL_GRACE_MS", "2000")
        .env_remove("ATST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn send(child: &Child, signal: &str) {
    let status = Command::new("kill").args([signal, &child.id().to_string()]).status().unwrap();
    assert!(status.success());
}

#[test]
fn interrupt_exits_with_130() {
    let child = spawn_atst(&["sleep 30"]);
    std::thread::sleep(Duration::from_millis(500));
    let started = Instant::now();
    send(&child, "-INT");

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(130));
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn sigterm_is_treated_like_interrupt() {
    let child = spawn_atst(&["sleep 30"]);
    std::thread::sleep(Duration::from_millis(500));
    send(&child, "-TERM");

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(130));
}

#[test]
fn kill_on_cancel_terminates_programs() {
    let child = spawn_atst(&["--kill-on-cancel", "sleep 30"]);
    std::thread::sleep(Duration::from_millis(500));
    send(&child, "-INT");

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(130));
    assert!(stdout.contains("[0]: `sleep` exited abnormally: terminated by signal 15"), "{stdout}");
}

#[test]
fn closed_stdout_still_reports_later_failures() {
    let mut child = spawn_atst(&["-p", "sh", "-a", "-c", "-a", "echo a; sleep 0.3; exit 3"]);
    drop(child.stdout.take());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}
