use std::time::Instant;

use chrono::Utc;
use log::debug;

use crate::sampler::UtilizationSample;

use super::{ActivityState, DetectorConfig, DetectorError, EventMetrics, SessionEvent};

/// Hysteresis + hold-timer state machine over utilization readings.
///
/// One `step` per tick, zero or one event per step. The hysteresis band
/// between the two thresholds absorbs oscillation near a single boundary;
/// the hold timer in `SuspectInactive` absorbs brief dips (loading screens,
/// cutscenes) without firing a false `GameEnded`.
pub struct ActivityDetector {
    config: DetectorConfig,
    state: ActivityState,
    below_inactive_since: Option<Instant>,
    last_timestamp: Option<Instant>,
}

impl ActivityDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ActivityState::Idle,
            below_inactive_since: None,
            last_timestamp: None,
        })
    }

    pub fn state(&self) -> ActivityState {
        self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Return the runtime state to `{Idle, None}`. The configuration is
    /// immutable; changing it means constructing a new detector.
    pub fn reset(&mut self) {
        self.state = ActivityState::Idle;
        self.below_inactive_since = None;
        self.last_timestamp = None;
    }

    /// Advance the machine by one tick.
    ///
    /// Samples must carry strictly increasing timestamps; a non-increasing
    /// timestamp is rejected without touching any state, so hold-timer
    /// elapsed time can never go backwards.
    pub fn step(
        &mut self,
        sample: &UtilizationSample,
    ) -> Result<Option<SessionEvent>, DetectorError> {
        if let Some(previous) = self.last_timestamp {
            if sample.timestamp <= previous {
                return Err(DetectorError::OutOfOrderSample);
            }
        }
        self.last_timestamp = Some(sample.timestamp);

        let (utilization, source_label) = effective_utilization(sample);
        let now = sample.timestamp;
        let previous_state = self.state;

        let event = match self.state {
            ActivityState::Idle => {
                if utilization >= self.config.active_threshold {
                    self.state = ActivityState::Active;
                    self.below_inactive_since = None;
                    Some(self.game_started(utilization, source_label, sample))
                } else {
                    None
                }
            }
            ActivityState::Active => {
                if utilization < self.config.inactive_threshold {
                    self.state = ActivityState::SuspectInactive;
                    self.below_inactive_since = Some(now);
                }
                // Readings in the hysteresis band or above the active
                // threshold keep the session active as-is.
                None
            }
            ActivityState::SuspectInactive => {
                if utilization >= self.config.inactive_threshold {
                    // Recovery anywhere at/above the inactive threshold,
                    // including into the band, counts as still active.
                    self.state = ActivityState::Active;
                    self.below_inactive_since = None;
                    None
                } else {
                    let since = *self.below_inactive_since.get_or_insert(now);
                    if now.duration_since(since) >= self.config.inactive_hold {
                        self.state = ActivityState::Inactive;
                        self.below_inactive_since = None;
                        Some(self.game_ended(utilization, source_label, sample))
                    } else {
                        None
                    }
                }
            }
            ActivityState::Inactive => {
                if utilization >= self.config.active_threshold {
                    // New episode.
                    self.state = ActivityState::Active;
                    self.below_inactive_since = None;
                    Some(self.game_started(utilization, source_label, sample))
                } else {
                    self.state = ActivityState::Idle;
                    None
                }
            }
        };

        if self.state != previous_state {
            debug!(
                "activity {:?} -> {:?} ({} {:.1}%)",
                previous_state, self.state, source_label, utilization
            );
        }

        Ok(event)
    }

    fn game_started(
        &self,
        utilization: f32,
        source_label: &str,
        sample: &UtilizationSample,
    ) -> SessionEvent {
        SessionEvent::GameStarted {
            at: Utc::now(),
            reason: format!(
                "{source_label} {utilization:.1}% >= {:.0}%",
                self.config.active_threshold
            ),
            metrics: EventMetrics {
                gpu: sample.gpu_percent,
                cpu: sample.cpu_percent,
            },
        }
    }

    fn game_ended(
        &self,
        utilization: f32,
        source_label: &str,
        sample: &UtilizationSample,
    ) -> SessionEvent {
        SessionEvent::GameEnded {
            at: Utc::now(),
            reason: format!(
                "{source_label} {utilization:.1}% < {:.0}% for {}s",
                self.config.inactive_threshold,
                self.config.inactive_hold.as_secs()
            ),
            metrics: EventMetrics {
                gpu: sample.gpu_percent,
                cpu: sample.cpu_percent,
            },
        }
    }
}

/// The single scalar evaluated per tick: max(gpu, cpu) when GPU telemetry is
/// present, the CPU reading alone otherwise. Each tick is judged from its
/// own sample, so a source flipping `gpu_available` between ticks needs no
/// special-casing here.
fn effective_utilization(sample: &UtilizationSample) -> (f32, &'static str) {
    match sample.gpu_percent {
        Some(gpu) if sample.gpu_available => {
            if gpu >= sample.cpu_percent {
                (gpu, "GPU")
            } else {
                (sample.cpu_percent, "CPU")
            }
        }
        _ => (sample.cpu_percent, "CPU"),
    }
}
