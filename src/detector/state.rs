use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the detector currently believes the session is.
///
/// `SuspectInactive` is provisional: utilization has dropped below the
/// inactive threshold but the hold duration has not elapsed, so the machine
/// can still revert to `Active` without emitting anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityState {
    Idle,
    Active,
    SuspectInactive,
    Inactive,
}

impl Default for ActivityState {
    fn default() -> Self {
        ActivityState::Idle
    }
}

/// GPU/CPU readings attached to an emitted event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EventMetrics {
    pub gpu: Option<f32>,
    pub cpu: f32,
}

/// Lifecycle event emitted by the detector, at most one per tick.
///
/// `GameEnded` is edge-triggered: it fires exactly once per inactivity
/// episode, never repeatedly while the machine sits in `Inactive`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    GameStarted {
        at: DateTime<Utc>,
        reason: String,
        metrics: EventMetrics,
    },
    GameEnded {
        at: DateTime<Utc>,
        reason: String,
        metrics: EventMetrics,
    },
}

impl SessionEvent {
    pub fn is_game_ended(&self) -> bool {
        matches!(self, SessionEvent::GameEnded { .. })
    }
}
