// ── Core error types ──
//
// Recoverable conditions (`Infeasible`, a failed or late telemetry query)
// never abort the dashboard loop; the session absorbs them and retries on the
// next tick. Everything surfaced through `CoreError` is fatal to the session.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Renderer input contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("cannot chart an empty series")]
    EmptySeries,

    #[error("chart height must be at least one row")]
    ZeroHeight,

    #[error("value {value} lies outside the axis range [{minimum}, {maximum}]")]
    RangeViolation {
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    #[error("cannot express {used} of {total} as a usage ratio")]
    InvalidRatio { used: f64, total: f64 },
}

/// The terminal is too small to host the minimum-sized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "{lines}x{cols} cells cannot fit {panes} pane(s) of at least {min_lines}x{min_cols}"
)]
pub struct Infeasible {
    pub lines: u16,
    pub cols: u16,
    pub panes: usize,
    pub min_lines: u16,
    pub min_cols: u16,
}

/// Failures of a single telemetry query.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("telemetry query timed out after {0:?}")]
    Timeout(Duration),
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session preconditions ────────────────────────────────────────
    #[error("No GPUs found")]
    NoGpus,

    #[error(
        "telemetry reported {received} GPUs but the session was started with {expected}"
    )]
    TelemetryCountMismatch { expected: usize, received: usize },

    // ── Wrapped ──────────────────────────────────────────────────────
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}
