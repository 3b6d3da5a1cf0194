mod config;
mod machine;
mod state;

pub use config::DetectorConfig;
pub use machine::ActivityDetector;
pub use state::{ActivityState, EventMetrics, SessionEvent};

use thiserror::Error;

/// Errors the detector can produce. Threshold crossings are never errors;
/// they are transitions. Only malformed configuration or malformed input
/// samples end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    #[error("invalid detector configuration: {0}")]
    Configuration(String),

    #[error("sample timestamp is not after the previous sample")]
    OutOfOrderSample,
}
