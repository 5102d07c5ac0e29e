//! The dashboard session: sole owner of every [`PaneState`] and its geometry.
//!
//! A session is driven one step at a time by its host:
//!
//! 1. [`resize`](DashboardSession::resize) whenever the terminal reports new
//!    dimensions,
//! 2. [`ensure_layout`](DashboardSession::ensure_layout) before drawing,
//! 3. [`ingest`](DashboardSession::ingest) with each tick's telemetry,
//! 4. [`view`](DashboardSession::view) to obtain ready-to-blit chart rows.
//!
//! The session performs no I/O of its own, so every transition is testable
//! without a terminal or a GPU.

use std::collections::{BTreeMap, BTreeSet};

use strum::Display;
use tracing::{debug, info, warn};

use crate::chart::{SeriesChart, SeriesOptions, UsageBar, render_series, render_usage_bar};
use crate::error::{CoreError, Infeasible};
use crate::layout::{LayoutPlan, MinPaneSize, PaneGeometry, plan};
use crate::model::{GpuIndex, GpuSample};
use crate::pane::{PaneRegions, PaneState};

/// Lifecycle of a [`DashboardSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Initializing,
    Running,
    Resizing,
    Terminated,
}

/// Knobs a host chooses when starting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub min_pane: MinPaneSize,
    /// Lines at the bottom of the terminal kept out of the pane grid.
    pub reserved_lines: u16,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_pane: MinPaneSize::default(),
            reserved_lines: 1,
        }
    }
}

/// Result of [`DashboardSession::ensure_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Geometry is what it was after the last successful plan.
    Unchanged,
    /// Geometry changed; every pane's history has been reset.
    Replanned,
    /// The terminal cannot host the grid. Retried on every call until it can.
    TooSmall(Infeasible),
}

/// What one [`ingest`](DashboardSession::ingest) call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub fresh: usize,
    /// Panes that reused their previous reading this tick.
    pub stale: Vec<GpuIndex>,
}

/// Everything needed to draw one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneView {
    pub index: GpuIndex,
    pub title: String,
    pub geometry: PaneGeometry,
    pub regions: PaneRegions,
    /// `None` until the first reading lands in the history.
    pub chart: Option<SeriesChart>,
    /// `None` until the GPU has reported memory at least once.
    pub bar: Option<UsageBar>,
    pub stale: bool,
    pub utilization: Option<f64>,
    pub usage_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// No layout has been attempted yet.
    Pending,
    TooSmall(Infeasible),
    Panes(Vec<PaneView>),
}

#[derive(Debug)]
pub struct DashboardSession {
    panes: BTreeMap<GpuIndex, PaneState>,
    layout: Option<LayoutPlan>,
    infeasible: Option<Infeasible>,
    viewport: (u16, u16),
    settings: SessionSettings,
    state: SessionState,
    needs_replan: bool,
    ticks: u64,
}

impl DashboardSession {
    /// Create a session from the startup snapshot and the terminal's current
    /// `lines × cols`.
    ///
    /// The pane count is fixed from here on. Fails with
    /// [`CoreError::NoGpus`] when the snapshot is empty.
    pub fn start(
        initial: &[GpuSample],
        lines: u16,
        cols: u16,
        settings: SessionSettings,
    ) -> Result<Self, CoreError> {
        let mut panes = BTreeMap::new();
        for sample in initial {
            panes
                .entry(sample.index)
                .or_insert_with(|| PaneState::new(sample, 0));
        }
        if panes.is_empty() {
            return Err(CoreError::NoGpus);
        }
        let min_pane = settings.min_pane.at_least_floor();
        if min_pane != settings.min_pane {
            warn!(
                requested = ?settings.min_pane,
                used = ?min_pane,
                "minimum pane size raised to fit pane chrome"
            );
        }
        let settings = SessionSettings { min_pane, ..settings };
        info!(gpus = panes.len(), lines, cols, "dashboard session started");

        Ok(Self {
            panes,
            layout: None,
            infeasible: None,
            viewport: (lines, cols),
            settings,
            state: SessionState::Initializing,
            needs_replan: true,
            ticks: 0,
        })
    }

    // ── Transitions ─────────────────────────────────────────────────

    /// Record new terminal dimensions. The grid is re-planned on the next
    /// [`ensure_layout`](Self::ensure_layout).
    pub fn resize(&mut self, lines: u16, cols: u16) {
        if self.state == SessionState::Terminated {
            return;
        }
        debug!(lines, cols, "terminal resized");
        self.viewport = (lines, cols);
        self.needs_replan = true;
        self.state = SessionState::Resizing;
    }

    /// Re-plan the grid if a resize is pending or the last attempt did not
    /// fit. A geometry change resets every pane's history to the new chart
    /// width.
    pub fn ensure_layout(&mut self) -> PlanOutcome {
        if !self.needs_replan && self.infeasible.is_none() {
            return PlanOutcome::Unchanged;
        }

        let (lines, cols) = self.viewport;
        let usable = lines.saturating_sub(self.settings.reserved_lines);
        let planned = match plan(usable, cols, self.panes.len(), self.settings.min_pane) {
            Ok(planned) => planned,
            Err(infeasible) => {
                if self.infeasible.is_none() {
                    warn!(%infeasible, "terminal too small for dashboard");
                }
                self.infeasible = Some(infeasible);
                self.needs_replan = false;
                if self.state != SessionState::Terminated {
                    self.state = SessionState::Resizing;
                }
                return PlanOutcome::TooSmall(infeasible);
            }
        };

        self.infeasible = None;
        self.needs_replan = false;
        if self.state != SessionState::Terminated {
            self.state = SessionState::Running;
        }

        if self.layout.as_ref() == Some(&planned) {
            return PlanOutcome::Unchanged;
        }

        let capacity = planned
            .panes
            .first()
            .map_or(0, |g| PaneRegions::for_geometry(g).history_capacity());
        for pane in self.panes.values_mut() {
            pane.reset_history(capacity);
        }
        info!(
            rows = planned.grid.rows,
            cols = planned.grid.cols,
            capacity,
            "layout planned"
        );
        self.layout = Some(planned);
        PlanOutcome::Replanned
    }

    /// Fold one telemetry snapshot into the panes.
    ///
    /// GPUs absent from `samples`, or whose sample is malformed, repeat their
    /// previous reading. A sample for a GPU the session was not started with
    /// is fatal.
    pub fn ingest(&mut self, samples: &[GpuSample]) -> Result<IngestReport, CoreError> {
        let unknown: BTreeSet<GpuIndex> = samples
            .iter()
            .map(|s| s.index)
            .filter(|index| !self.panes.contains_key(index))
            .collect();
        if !unknown.is_empty() {
            let expected = self.panes.len();
            return Err(CoreError::TelemetryCountMismatch {
                expected,
                received: expected + unknown.len(),
            });
        }

        let mut report = IngestReport::default();
        for (index, pane) in &mut self.panes {
            match samples.iter().find(|s| s.index == *index) {
                Some(sample) if sample.is_well_formed() => {
                    pane.record(sample);
                    report.fresh += 1;
                }
                _ => {
                    pane.carry_forward();
                    report.stale.push(*index);
                }
            }
        }
        if !report.stale.is_empty() {
            debug!(stale = ?report.stale, "reusing previous readings");
        }

        self.ticks += 1;
        Ok(report)
    }

    /// Render every pane's charts for the current geometry.
    pub fn view(&self) -> Result<DashboardView, CoreError> {
        if let Some(infeasible) = self.infeasible {
            return Ok(DashboardView::TooSmall(infeasible));
        }
        let Some(layout) = &self.layout else {
            return Ok(DashboardView::Pending);
        };

        let options = SeriesOptions::utilization();
        let mut views = Vec::with_capacity(self.panes.len());
        for (pane, geometry) in self.panes.values().zip(&layout.panes) {
            let regions = PaneRegions::for_geometry(geometry);
            let chart = if pane.history().is_empty() || !regions.chart_fits() {
                None
            } else {
                Some(render_series(
                    &pane.history().to_vec(),
                    usize::from(regions.chart.lines),
                    &options,
                )?)
            };
            let bar = pane
                .memory()
                .filter(|_| regions.bar_fits())
                .map(|m| {
                    render_usage_bar(
                        m.used_mib,
                        m.total_mib,
                        usize::from(regions.bar.lines),
                        usize::from(regions.bar.cols),
                    )
                })
                .transpose()?;

            views.push(PaneView {
                index: pane.index(),
                title: pane.title(geometry.cols),
                geometry: *geometry,
                regions,
                chart,
                bar,
                stale: pane.is_stale(),
                utilization: pane.last_utilization(),
                usage_ratio: pane.memory().map(|m| m.ratio()),
            });
        }
        Ok(DashboardView::Panes(views))
    }

    pub fn request_quit(&mut self) {
        info!(ticks = self.ticks, "dashboard session terminated");
        self.state = SessionState::Terminated;
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != SessionState::Terminated
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn pane(&self, index: GpuIndex) -> Option<&PaneState> {
        self.panes.get(&index)
    }

    /// Panes in ascending GPU index order.
    pub fn panes(&self) -> impl Iterator<Item = &PaneState> {
        self.panes.values()
    }

    pub fn layout(&self) -> Option<&LayoutPlan> {
        self.layout.as_ref()
    }

    /// Current `(lines, cols)` of the whole terminal.
    pub fn viewport(&self) -> (u16, u16) {
        self.viewport
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
