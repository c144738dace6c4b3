//! Output formats and coloring.

use crate::prelude::*;

#[test]
fn json_output_is_one_record_per_line() {
    let run = cli().args(&["-o", "json", "echo hi"]).passes();

    let lines = run.stdout_lines();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(
        record,
        serde_json::json!({"command": "echo", "index": 0, "kind": "stdout", "msg": "hi"})
    );
}

#[test]
fn json_error_records_carry_their_kind() {
    let run = cli().args(&["--output", "json", "atst-definitely-missing"]).code(1);

    let record: serde_json::Value = serde_json::from_str(&run.stdout_lines()[0]).unwrap();
    assert_eq!(record["kind"], serde_json::json!({"error": "start"}));
    assert_eq!(record["command"], "atst-definitely-missing");
}

#[test]
fn forced_color_wraps_the_prefix() {
    cli()
        .env("NO_COLOR", "0")
        .env("COLOR", "1")
        .args(&["echo hi"])
        .passes()
        .stdout_eq("\x1b[38;5;74m[0]\x1b[0m: hi\n");
}

#[test]
fn no_color_disables_color() {
    cli().env("COLOR", "1").args(&["echo hi"]).passes().stdout_eq("[0]: hi\n");
}
