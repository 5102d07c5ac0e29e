//! Per-GPU pane state: a bounded utilization history plus the last memory
//! reading, and the sub-regions a pane's geometry carves out for its charts.

use std::collections::VecDeque;

use crate::chart::LabelFormat;
use crate::layout::PaneGeometry;
use crate::model::{GpuIndex, GpuSample};

/// Width of the memory column, in cells.
pub const BAR_WIDTH: u16 = 5;

/// Chart and bar regions shorter than this are left blank.
const MIN_REGION_LINES: u16 = 2;

// ── Regions ─────────────────────────────────────────────────────────

/// A rectangle relative to its pane's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub y: u16,
    pub x: u16,
    pub lines: u16,
    pub cols: u16,
}

/// Where the line chart and usage bar sit inside a pane.
///
/// The top border carries the title and is followed by one blank line; the
/// chart then runs down to the bottom border. The bar hugs the right border
/// with one blank column between it and the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneRegions {
    pub chart: Region,
    pub bar: Region,
}

impl PaneRegions {
    pub fn for_geometry(geometry: &PaneGeometry) -> Self {
        let lines = geometry.lines.saturating_sub(3);
        Self {
            chart: Region {
                y: 2,
                x: 2,
                lines,
                cols: geometry.cols.saturating_sub(BAR_WIDTH + 5),
            },
            bar: Region {
                y: 2,
                x: geometry.cols.saturating_sub(BAR_WIDTH + 2),
                lines,
                cols: BAR_WIDTH,
            },
        }
    }

    /// Samples the chart region can show once the percent axis is drawn.
    pub fn history_capacity(&self) -> usize {
        usize::from(self.chart.cols).saturating_sub(LabelFormat::percent().axis_width(0.0, 100.0))
    }

    /// Room for an axis and at least one sample.
    pub fn chart_fits(&self) -> bool {
        self.chart.lines >= MIN_REGION_LINES && self.history_capacity() > 0
    }

    /// Room for the label row plus at least one fill row.
    pub fn bar_fits(&self) -> bool {
        self.bar.lines >= MIN_REGION_LINES && self.bar.cols > 0
    }
}

// ── Rolling series ──────────────────────────────────────────────────

/// FIFO of the most recent `capacity` values; pushing past capacity evicts
/// the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    values: VecDeque<f64>,
    capacity: usize,
}

impl RollingSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Drop every value and adopt a new capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.values.clear();
        self.values.shrink_to(capacity);
        self.capacity = capacity;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Oldest-first copy, ready for [`render_series`](crate::render_series).
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

// ── Pane state ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryReading {
    pub used_mib: f64,
    pub total_mib: f64,
}

impl MemoryReading {
    pub fn ratio(&self) -> f64 {
        self.used_mib / self.total_mib
    }
}

/// Everything the dashboard remembers about one GPU between ticks.
#[derive(Debug, Clone)]
pub struct PaneState {
    index: GpuIndex,
    name: String,
    history: RollingSeries,
    last_utilization: Option<f64>,
    memory: Option<MemoryReading>,
    stale: bool,
}

impl PaneState {
    /// Seed a pane from the startup snapshot. History starts empty; the
    /// sample only primes the values a later missing reading falls back to.
    pub fn new(sample: &GpuSample, capacity: usize) -> Self {
        let mut pane = Self {
            index: sample.index,
            name: sample.name.trim().to_owned(),
            history: RollingSeries::with_capacity(capacity),
            last_utilization: None,
            memory: None,
            stale: false,
        };
        if sample.is_well_formed() {
            pane.last_utilization = Some(sample.clamped_utilization());
            pane.memory = Some(MemoryReading {
                used_mib: sample.memory_used_mib,
                total_mib: sample.memory_total_mib,
            });
        }
        pane
    }

    /// Fold one tick's sample in. Malformed samples are treated as missing.
    pub fn record(&mut self, sample: &GpuSample) {
        if !sample.is_well_formed() {
            self.carry_forward();
            return;
        }
        let utilization = sample.clamped_utilization();
        self.history.push(utilization);
        self.last_utilization = Some(utilization);
        self.memory = Some(MemoryReading {
            used_mib: sample.memory_used_mib,
            total_mib: sample.memory_total_mib,
        });
        self.stale = false;
    }

    /// Repeat the previous reading for a tick that produced none.
    pub fn carry_forward(&mut self) {
        if let Some(utilization) = self.last_utilization {
            self.history.push(utilization);
        }
        self.stale = true;
    }

    pub fn reset_history(&mut self, capacity: usize) {
        self.history.reset(capacity);
    }

    pub fn index(&self) -> GpuIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn history(&self) -> &RollingSeries {
        &self.history
    }

    pub fn memory(&self) -> Option<MemoryReading> {
        self.memory
    }

    pub fn last_utilization(&self) -> Option<f64> {
        self.last_utilization
    }

    /// Whether the most recent tick had to reuse older values.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// `GPU <index>: <name>`, with the name shortened to fit a pane `cols`
    /// wide.
    pub fn title(&self, cols: u16) -> String {
        let room = usize::from(cols).saturating_sub(11);
        if self.name.chars().count() <= room {
            return format!("GPU {}: {}", self.index, self.name);
        }
        let kept: String = self.name.chars().take(room.saturating_sub(1)).collect();
        format!("GPU {}: {kept}…", self.index)
    }
}
