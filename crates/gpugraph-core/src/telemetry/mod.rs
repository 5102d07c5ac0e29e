//! Where per-tick GPU readings come from.

mod nvidia_smi;
mod synthetic;

use std::future::Future;
use std::time::Duration;

pub use nvidia_smi::{NvidiaSmi, parse_query_output};
pub use synthetic::SyntheticSource;

use crate::error::TelemetryError;
use crate::model::GpuSample;

/// A provider of GPU snapshots.
///
/// Each call returns one sample per GPU currently visible. An empty snapshot
/// means "no GPUs"; it is not an error.
pub trait TelemetrySource: Send {
    /// Human-readable name for logs and the status line.
    fn describe(&self) -> String;

    fn snapshot(
        &mut self,
    ) -> impl Future<Output = Result<Vec<GpuSample>, TelemetryError>> + Send;
}

/// Take a snapshot, giving up after `limit`.
pub async fn snapshot_within<S: TelemetrySource>(
    source: &mut S,
    limit: Duration,
) -> Result<Vec<GpuSample>, TelemetryError> {
    tokio::time::timeout(limit, source.snapshot())
        .await
        .map_err(|_| TelemetryError::Timeout(limit))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Stalled;

    impl TelemetrySource for Stalled {
        fn describe(&self) -> String {
            "stalled".into()
        }

        async fn snapshot(&mut self) -> Result<Vec<GpuSample>, TelemetryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out() {
        let err = snapshot_within(&mut Stalled, Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, TelemetryError::Timeout(d) if d == Duration::from_secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_source_is_passed_through() {
        let mut source = SyntheticSource::new(2);
        let samples = snapshot_within(&mut source, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(samples.len(), 2);
    }
}
