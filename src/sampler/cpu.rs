use sysinfo::System;

/// System-wide CPU utilization via sysinfo.
pub struct CpuSampler {
    system: System,
}

impl CpuSampler {
    pub fn new() -> Self {
        let mut system = System::new();

        // Initial refresh to establish baseline for CPU calculation;
        // usage is a delta between refreshes.
        system.refresh_cpu_usage();

        Self { system }
    }

    /// Sample current global CPU utilization (0-100).
    pub fn sample(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_within_percentage_range() {
        let mut sampler = CpuSampler::new();
        let value = sampler.sample();
        assert!((0.0..=100.0).contains(&value));
    }
}
