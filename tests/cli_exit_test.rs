//! Exit status and final output line of the `podcheck` binary on the fixture runs.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn podcheck_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_podcheck"))
}

/// Run `podcheck` from `tests/data/<fixture>`, the way it is launched inside a run directory.
fn run_in(fixture: &str, args: &[&str]) -> Output {
    Command::new(podcheck_bin())
        .args(args)
        .current_dir(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(fixture))
        .env_remove("PODCHECK_ERROR_MARGIN")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run podcheck")
}

fn last_stdout_line(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

#[test]
fn test_pass_exits_zero() {
    let output = run_in("pass", &[]);
    assert_eq!(output.status.code(), Some(0), "output: {:?}", output);
    assert_eq!(last_stdout_line(&output), "Everything passed");
}

#[test]
fn test_diverged_exits_one() {
    let output = run_in("diverged", &[]);
    assert_eq!(output.status.code(), Some(1), "output: {:?}", output);
    assert_eq!(last_stdout_line(&output), "2 tolerance violation(s)");
}

#[test]
fn test_diverged_within_wider_margin_exits_zero() {
    let output = run_in("diverged", &["-em", "5"]);
    assert_eq!(output.status.code(), Some(0), "output: {:?}", output);
    assert_eq!(last_stdout_line(&output), "Everything passed");
}

#[test]
fn test_missing_solution_report_exits_one() {
    let output = run_in("pass", &["-so", "missing.out"]);
    assert_eq!(output.status.code(), Some(1), "output: {:?}", output);
    assert!(output.stdout.is_empty(), "output: {:?}", output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"), "stderr: {stderr}");
    assert!(stderr.contains("missing.out"), "stderr: {stderr}");
}
