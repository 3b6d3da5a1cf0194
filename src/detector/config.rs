use std::time::Duration;

use super::DetectorError;

/// Configuration for activity detection with tunable thresholds.
///
/// The gap between `active_threshold` and `inactive_threshold` is the
/// hysteresis band: readings inside it neither confirm nor revoke activity.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Utilization at/above this enters ACTIVE (0-100)
    pub active_threshold: f32,

    /// Utilization strictly below this starts the inactivity hold (0-100)
    pub inactive_threshold: f32,

    /// How long utilization must stay below `inactive_threshold` before the
    /// session counts as ended
    pub inactive_hold: Duration,

    /// Tick cadence of the scheduling loop
    pub sample_interval: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            active_threshold: 80.0,
            inactive_threshold: 35.0,
            inactive_hold: Duration::from_secs(10),
            sample_interval: Duration::from_millis(1000),
        }
    }
}

impl DetectorConfig {
    pub fn new(
        active_threshold: f32,
        inactive_threshold: f32,
        inactive_hold: Duration,
        sample_interval: Duration,
    ) -> Result<Self, DetectorError> {
        let config = Self {
            active_threshold,
            inactive_threshold,
            inactive_hold,
            sample_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on invalid threshold/duration relationships. Never clamps.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if !(0.0..=100.0).contains(&self.active_threshold) {
            return Err(DetectorError::Configuration(format!(
                "active_threshold {} is outside 0-100",
                self.active_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.inactive_threshold) {
            return Err(DetectorError::Configuration(format!(
                "inactive_threshold {} is outside 0-100",
                self.inactive_threshold
            )));
        }
        if self.inactive_threshold >= self.active_threshold {
            return Err(DetectorError::Configuration(format!(
                "inactive_threshold {} must be below active_threshold {}",
                self.inactive_threshold, self.active_threshold
            )));
        }
        if self.inactive_hold.is_zero() {
            return Err(DetectorError::Configuration(
                "inactive_hold must be greater than zero".into(),
            ));
        }
        if self.sample_interval.is_zero() {
            return Err(DetectorError::Configuration(
                "sample_interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = DetectorConfig::new(
            35.0,
            80.0,
            Duration::from_secs(10),
            Duration::from_millis(1000),
        )
        .unwrap_err();
        assert!(matches!(err, DetectorError::Configuration(_)));
    }

    #[test]
    fn rejects_equal_thresholds() {
        let result = DetectorConfig::new(
            50.0,
            50.0,
            Duration::from_secs(10),
            Duration::from_millis(1000),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let result = DetectorConfig::new(
            120.0,
            35.0,
            Duration::from_secs(10),
            Duration::from_millis(1000),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_hold_duration() {
        let result = DetectorConfig::new(80.0, 35.0, Duration::ZERO, Duration::from_millis(1000));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_sample_interval() {
        let result = DetectorConfig::new(80.0, 35.0, Duration::from_secs(10), Duration::ZERO);
        assert!(result.is_err());
    }
}
