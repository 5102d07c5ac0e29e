//! Terminal-independent engine behind the `gpugraph` dashboard.
//!
//! - **[`chart`]**: Pure renderers turning a bounded utilization series into a
//!   box-drawing line chart ([`render_series`]) and a used/total pair into a
//!   half-block column ([`render_usage_bar`]). No I/O, no terminal state.
//!
//! - **[`layout`]**: Partitions the terminal into one pane per GPU under
//!   minimum-size constraints, or reports [`Infeasible`].
//!
//! - **[`pane`]**: Per-GPU rolling history plus last-known memory readings.
//!
//! - **[`session`]**: [`DashboardSession`], the single owner of every pane and
//!   its geometry. Drives the plan → ingest → view cycle one tick at a time;
//!   the binary only feeds it events and blits the resulting [`DashboardView`].
//!
//! - **[`telemetry`]**: The [`TelemetrySource`] contract with an `nvidia-smi`
//!   implementation and a synthetic source for demos.

pub mod chart;
pub mod error;
pub mod layout;
pub mod model;
pub mod pane;
pub mod session;
pub mod telemetry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chart::{LabelFormat, SeriesChart, SeriesOptions, UsageBar, render_series, render_usage_bar};
pub use error::{ChartError, CoreError, Infeasible, TelemetryError};
pub use layout::{GridShape, LayoutPlan, MinPaneSize, PaneGeometry, plan};
pub use model::{GpuIndex, GpuSample};
pub use pane::{MemoryReading, PaneRegions, PaneState, Region, RollingSeries};
pub use session::{
    DashboardSession, DashboardView, IngestReport, PaneView, PlanOutcome, SessionSettings,
    SessionState,
};
pub use telemetry::{NvidiaSmi, SyntheticSource, TelemetrySource};
