use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::info;

use super::{CpuSampler, NvidiaSmiSampler, SourceUnavailable, UtilizationSample, UtilizationSource};

const GPU_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Combined GPU + CPU utilization source.
///
/// GPU availability is a runtime property, not an init-time decision: when
/// an nvidia-smi query fails the sampler falls back to CPU-only readings and
/// retries the GPU every 10 seconds to detect recovery. Availability flips
/// are logged once per transition, not per tick.
pub struct HardwareSampler {
    gpu: NvidiaSmiSampler,
    cpu: CpuSampler,
    gpu_available: bool,
    last_gpu_retry: Option<Instant>,
}

impl HardwareSampler {
    pub fn new() -> Self {
        Self {
            gpu: NvidiaSmiSampler::new(),
            cpu: CpuSampler::new(),
            gpu_available: false,
            last_gpu_retry: None,
        }
    }

    pub fn gpu_available(&self) -> bool {
        self.gpu_available
    }
}

#[async_trait]
impl UtilizationSource for HardwareSampler {
    async fn read(&mut self) -> Result<UtilizationSample, SourceUnavailable> {
        let cpu_percent = self.cpu.sample();

        let should_try_gpu = self.gpu_available
            || self
                .last_gpu_retry
                .map_or(true, |at| at.elapsed() >= GPU_RETRY_INTERVAL);

        let gpu_percent = if should_try_gpu {
            self.gpu.sample().await
        } else {
            None
        };

        let was_available = self.gpu_available;
        self.gpu_available = gpu_percent.is_some();
        if was_available != self.gpu_available {
            if self.gpu_available {
                info!("GPU telemetry available (leaving CPU fallback)");
            } else {
                info!("GPU telemetry unavailable (switching to CPU fallback)");
            }
        }
        // Reschedule the retry only after an attempt actually failed.
        if !self.gpu_available && should_try_gpu {
            self.last_gpu_retry = Some(Instant::now());
        }

        Ok(UtilizationSample {
            gpu_percent,
            cpu_percent,
            timestamp: Instant::now(),
            gpu_available: self.gpu_available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readings_are_well_formed() {
        let mut sampler = HardwareSampler::new();

        let sample = sampler.read().await.unwrap();

        assert!((0.0..=100.0).contains(&sample.cpu_percent));
        assert_eq!(sample.gpu_available, sample.gpu_percent.is_some());
        assert_eq!(sampler.gpu_available(), sample.gpu_available);
        if let Some(gpu) = sample.gpu_percent {
            assert!((0.0..=100.0).contains(&gpu));
        }
    }

    #[tokio::test]
    async fn timestamps_increase_across_reads() {
        let mut sampler = HardwareSampler::new();

        let first = sampler.read().await.unwrap();
        let second = sampler.read().await.unwrap();

        assert!(second.timestamp > first.timestamp);
    }
}
