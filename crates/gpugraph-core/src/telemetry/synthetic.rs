use std::future::{Future, ready};

use super::TelemetrySource;
use crate::error::TelemetryError;
use crate::model::{GpuIndex, GpuSample};

const MODELS: [(&str, f64); 4] = [
    ("Demo A100-SXM4-80GB", 81_920.0),
    ("Demo H100 PCIe", 81_559.0),
    ("Demo RTX 4090", 24_564.0),
    ("Demo L4", 23_034.0),
];

/// Deterministic fake GPUs for running the dashboard without a driver.
///
/// Utilization follows a slow sine per device, memory a cosine, each phase
/// shifted by the GPU index so panes never move in lockstep.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    count: GpuIndex,
    tick: u64,
}

impl SyntheticSource {
    pub fn new(count: GpuIndex) -> Self {
        Self { count, tick: 0 }
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn sample(&self, index: GpuIndex) -> GpuSample {
        let t = self.tick as f64;
        let phase = f64::from(index) * 1.1;
        let (name, total) = MODELS[index as usize % MODELS.len()];

        let utilization = 50.0 + 45.0 * (t * 0.3 + phase).sin();
        let used = total * (0.45 + 0.35 * (t * 0.11 + phase).cos());
        GpuSample::new(index, name, utilization.round(), used.round(), total)
    }
}

impl TelemetrySource for SyntheticSource {
    fn describe(&self) -> String {
        format!("demo ({} GPUs)", self.count)
    }

    fn snapshot(
        &mut self,
    ) -> impl Future<Output = Result<Vec<GpuSample>, TelemetryError>> + Send {
        let samples: Vec<GpuSample> = (0..self.count).map(|i| self.sample(i)).collect();
        self.tick += 1;
        ready(Ok(samples))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn readings_are_well_formed_and_in_range() {
        let mut source = SyntheticSource::new(5);
        for _ in 0..50 {
            let samples = source.snapshot().await.unwrap();
            assert_eq!(samples.len(), 5);
            for s in &samples {
                assert!(s.is_well_formed(), "{s:?}");
                assert!((0.0..=100.0).contains(&s.utilization_percent));
                assert!(s.memory_used_mib <= s.memory_total_mib);
            }
        }
    }

    #[tokio::test]
    async fn sequence_is_reproducible() {
        let (mut a, mut b) = (SyntheticSource::new(3), SyntheticSource::new(3));
        for _ in 0..10 {
            assert_eq!(a.snapshot().await.unwrap(), b.snapshot().await.unwrap());
        }
    }
}
