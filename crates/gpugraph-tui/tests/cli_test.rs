//! Integration tests for the `gpugraph` binary.
//!
//! These cover argument parsing, configuration resolution and startup
//! preconditions. None of them need a GPU or an interactive terminal.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `gpugraph` binary with env isolation.
///
/// Clears all `GPUGRAPH_*` env vars, points config directories at an empty
/// temp dir and sends logs there too, so tests never touch the user's real
/// configuration.
fn gpugraph_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gpugraph");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("GPUGRAPH_INTERVAL_SECS")
        .env_remove("GPUGRAPH_TELEMETRY_TIMEOUT_SECS")
        .env_remove("GPUGRAPH_NVIDIA_SMI")
        .env_remove("GPUGRAPH_MIN_PANE_LINES")
        .env_remove("GPUGRAPH_MIN_PANE_COLS")
        .env_remove("GPUGRAPH_COLOR")
        .env_remove("GPUGRAPH_LOG_FILE")
        .env_remove("RUST_LOG")
        .arg("--log-file")
        .arg(home.path().join("gpugraph.log"));
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("GPU utilization")
            .and(predicate::str::contains("--interval"))
            .and(predicate::str::contains("--demo"))
            .and(predicate::str::contains("--print-config")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_print_config_shows_defaults_and_overrides() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .args(["--print-config", "--interval", "0.5", "--no-color"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("interval_secs = 0.5")
                .and(predicate::str::contains("telemetry_timeout_secs = 2.0"))
                .and(predicate::str::contains("color = false"))
                .and(predicate::str::contains("min_pane_lines = 10")),
        );
}

#[test]
fn test_config_file_and_env_are_layered() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    std::fs::write(&config, "interval_secs = 3.0\nmin_pane_cols = 22\n").unwrap();

    gpugraph_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("--print-config")
        .env("GPUGRAPH_MIN_PANE_COLS", "30")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("interval_secs = 3.0")
                .and(predicate::str::contains("min_pane_cols = 30")),
        );
}

#[test]
fn test_zero_interval_is_rejected() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .args(["--interval", "0", "--print-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval_secs"));
}

// ── Startup preconditions ───────────────────────────────────────────

#[test]
fn test_missing_driver_reports_no_gpus() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .args(["--nvidia-smi", "/nonexistent/gpugraph-test/nvidia-smi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No GPUs found"));
}

#[test]
fn test_failing_driver_is_reported() {
    let home = TempDir::new().unwrap();
    gpugraph_cmd(&home)
        .args(["--nvidia-smi", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exited with"));
}
