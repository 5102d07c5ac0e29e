//! Per-tick GPU readings as produced by a [`TelemetrySource`](crate::TelemetrySource).

/// Device ordinal as reported by the driver.
pub type GpuIndex = u32;

/// One GPU's readings for a single tick.
///
/// Samples are never mutated; each tick's snapshot supersedes the previous one
/// wholesale. Sources may hand out NaN for metrics the driver could not report,
/// so consumers check [`is_well_formed`](Self::is_well_formed) before trusting
/// the numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSample {
    pub index: GpuIndex,
    pub name: String,
    /// Busy percentage, nominally in `[0, 100]`.
    pub utilization_percent: f64,
    pub memory_used_mib: f64,
    pub memory_total_mib: f64,
}

impl GpuSample {
    pub fn new(
        index: GpuIndex,
        name: impl Into<String>,
        utilization_percent: f64,
        memory_used_mib: f64,
        memory_total_mib: f64,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            utilization_percent,
            memory_used_mib,
            memory_total_mib,
        }
    }

    /// Whether every metric is usable: finite utilization, finite non-negative
    /// used memory and a finite positive total.
    pub fn is_well_formed(&self) -> bool {
        self.utilization_percent.is_finite()
            && self.memory_used_mib.is_finite()
            && self.memory_used_mib >= 0.0
            && self.memory_total_mib.is_finite()
            && self.memory_total_mib > 0.0
    }

    /// Utilization pinned to the chart's `[0, 100]` axis.
    pub fn clamped_utilization(&self) -> f64 {
        self.utilization_percent.clamp(0.0, 100.0)
    }
}
