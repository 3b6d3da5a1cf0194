mod cpu;
mod gpu;
mod hardware;

pub use cpu::CpuSampler;
pub use gpu::NvidiaSmiSampler;
pub use hardware::HardwareSampler;

use async_trait::async_trait;
use std::time::Instant;
use thiserror::Error;

/// One utilization reading. Immutable once produced; one instance per tick.
#[derive(Debug, Clone, Copy)]
pub struct UtilizationSample {
    /// GPU utilization 0-100, `None` when GPU telemetry is missing.
    pub gpu_percent: Option<f32>,
    /// CPU utilization 0-100.
    pub cpu_percent: f32,
    /// Monotonic instant the reading was taken.
    pub timestamp: Instant,
    /// Whether GPU telemetry backed this reading.
    pub gpu_available: bool,
}

/// Total source failure: no reading at all this tick.
///
/// A missing GPU with a working CPU counter is NOT this error; it is a
/// normal sample with `gpu_available = false`.
#[derive(Debug, Error)]
#[error("utilization source unavailable: {reason}")]
pub struct SourceUnavailable {
    pub reason: String,
}

impl SourceUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Supplies one timestamped utilization reading per sampling tick.
#[async_trait]
pub trait UtilizationSource: Send {
    async fn read(&mut self) -> Result<UtilizationSample, SourceUnavailable>;
}
