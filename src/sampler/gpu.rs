use std::time::{Duration, Instant};

use log::debug;
use tokio::process::Command;
use tokio::time::timeout;

const QUERY_TIMEOUT: Duration = Duration::from_millis(500);
const MIN_QUERY_INTERVAL: Duration = Duration::from_secs(1);

/// NVIDIA GPU utilization sampler using the nvidia-smi CLI.
///
/// Queries GPU core utilization with
/// `nvidia-smi --query-gpu=utilization.gpu --format=csv,noheader,nounits`,
/// one value per GPU line, aggregated as the max across GPUs. Every failure
/// mode (binary missing, non-zero exit, empty output, parse error, timeout)
/// degrades to `None` without erroring.
pub struct NvidiaSmiSampler {
    last_query: Option<Instant>,
    last_value: Option<f32>,
}

impl NvidiaSmiSampler {
    pub fn new() -> Self {
        Self {
            last_query: None,
            last_value: None,
        }
    }

    /// Sample current GPU utilization (0-100), `None` if unavailable.
    ///
    /// Invocations are rate-limited to once per second; inside the window
    /// the previous reading is reused so a fast tick cadence cannot demote
    /// the source to CPU-only.
    pub async fn sample(&mut self) -> Option<f32> {
        if let Some(last) = self.last_query {
            if last.elapsed() < MIN_QUERY_INTERVAL {
                return self.last_value;
            }
        }

        self.last_query = Some(Instant::now());
        self.last_value = self.query().await;
        self.last_value
    }

    async fn query(&self) -> Option<f32> {
        let mut command = Command::new("nvidia-smi");
        command
            .args(["--query-gpu=utilization.gpu", "--format=csv,noheader,nounits"])
            .kill_on_drop(true);

        let output = match timeout(QUERY_TIMEOUT, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                debug!("nvidia-smi invocation failed: {err}");
                return None;
            }
            Err(_) => {
                debug!("nvidia-smi query timed out (> {}ms)", QUERY_TIMEOUT.as_millis());
                return None;
            }
        };

        if !output.status.success() {
            debug!("nvidia-smi returned non-zero exit code: {}", output.status);
            return None;
        }

        parse_utilization(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse one utilization value per GPU line; max across GPUs.
fn parse_utilization(stdout: &str) -> Option<f32> {
    let mut values = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<f32>() {
            Ok(value) if (0.0..=100.0).contains(&value) => values.push(value),
            Ok(value) => debug!("nvidia-smi returned out-of-range value: {value}"),
            Err(_) => debug!("nvidia-smi returned non-numeric line: {line}"),
        }
    }
    values.into_iter().reduce(f32::max)
}
