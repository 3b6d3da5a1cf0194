use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::detector::{ActivityDetector, DetectorConfig};
use crate::reminders::ReminderSink;
use crate::sampler::UtilizationSource;

use super::loop_worker::monitor_loop;

/// Owns the background monitoring task.
pub struct MonitorController {
    config: DetectorConfig,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            handle: None,
            cancel_token: None,
        }
    }

    /// Start monitoring. Each start constructs a fresh detector from the
    /// configuration, so a restart is always a validated reset to IDLE.
    pub fn start<S>(&mut self, source: S, sink: Arc<dyn ReminderSink>) -> Result<()>
    where
        S: UtilizationSource + 'static,
    {
        if self.handle.is_some() {
            bail!("monitor already running");
        }

        let detector = ActivityDetector::new(self.config.clone())
            .context("refusing to start with invalid configuration")?;

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(monitor_loop(detector, source, sink, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop scheduling further ticks and wait for the loop to wind down.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("monitor loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
