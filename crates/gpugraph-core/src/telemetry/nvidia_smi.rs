use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use super::TelemetrySource;
use crate::error::TelemetryError;
use crate::model::{GpuIndex, GpuSample};

const QUERY: [&str; 2] = [
    "--query-gpu=index,utilization.gpu,memory.used,memory.total,name",
    "--format=csv,noheader,nounits",
];

/// Telemetry from the NVIDIA driver's `nvidia-smi` utility.
///
/// A missing executable yields an empty snapshot, so a machine without the
/// driver simply reports no GPUs.
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    program: PathBuf,
}

impl NvidiaSmi {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for NvidiaSmi {
    fn default() -> Self {
        Self::new("nvidia-smi")
    }
}

impl TelemetrySource for NvidiaSmi {
    fn describe(&self) -> String {
        self.program.display().to_string()
    }

    async fn snapshot(&mut self) -> Result<Vec<GpuSample>, TelemetryError> {
        let output = match Command::new(&self.program)
            .args(QUERY)
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(program = %self.program.display(), "nvidia-smi not found");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(TelemetryError::Spawn {
                    program: self.describe(),
                    source,
                });
            }
        };

        if !output.status.success() {
            return Err(TelemetryError::Failed {
                program: self.describe(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(parse_query_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `index, utilization, used, total, name` rows.
///
/// Numeric fields the driver could not fill in (`[N/A]`, `[Not Supported]`)
/// become NaN so the sample reads as malformed. Rows without a usable index
/// are dropped.
pub fn parse_query_output(stdout: &str) -> Vec<GpuSample> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<GpuSample> {
    let fields: Vec<&str> = line.splitn(5, ',').map(str::trim).collect();
    let &[index, utilization, used, total, name] = fields.as_slice() else {
        warn!(line, "skipping nvidia-smi row with missing fields");
        return None;
    };
    let Ok(index) = index.parse::<GpuIndex>() else {
        warn!(line, "skipping nvidia-smi row without a GPU index");
        return None;
    };
    let number = |field: &str| field.parse::<f64>().unwrap_or(f64::NAN);

    Some(GpuSample::new(
        index,
        name,
        number(utilization),
        number(used),
        number(total),
    ))
}
