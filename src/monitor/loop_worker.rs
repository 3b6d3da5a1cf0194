use std::sync::Arc;

use log::{debug, info, warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::detector::ActivityDetector;
use crate::reminders::ReminderSink;
use crate::sampler::UtilizationSource;

/// Consecutive failed reads before the outage is surfaced at warn level.
const OUTAGE_WARN_TICKS: u32 = 5;

/// One tick: read the source, step the detector, forward any event.
///
/// Single writer by construction: this loop is the only caller of `step`,
/// and a tick's whole callback chain completes before the next one starts.
pub(crate) async fn monitor_loop(
    mut detector: ActivityDetector,
    mut source: impl UtilizationSource,
    sink: Arc<dyn ReminderSink>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(detector.config().sample_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut missed_reads: u32 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let sample = match source.read().await {
                    Ok(sample) => {
                        if missed_reads >= OUTAGE_WARN_TICKS {
                            info!("utilization source recovered after {missed_reads} missed ticks");
                        }
                        missed_reads = 0;
                        sample
                    }
                    Err(err) => {
                        // Skip the tick entirely: no step, no synthetic zero
                        // reading. The detector stays in its last state until
                        // data returns.
                        missed_reads += 1;
                        if missed_reads == OUTAGE_WARN_TICKS {
                            warn!("utilization source down for {missed_reads} consecutive ticks: {err}");
                        } else {
                            debug!("skipping tick: {err}");
                        }
                        continue;
                    }
                };

                match detector.step(&sample) {
                    Ok(Some(event)) => {
                        info!("detector emitted {event:?}");
                        sink.notify(&event);
                    }
                    Ok(None) => {}
                    Err(err) => warn!("dropped sample: {err}"),
                }
            }
            _ = cancel_token.cancelled() => {
                info!("monitor loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{DetectorConfig, SessionEvent};
    use crate::reminders::ChannelSink;
    use crate::sampler::{SourceUnavailable, UtilizationSample};
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    /// Replays a fixed reading script, advancing its own synthetic clock by
    /// one sample interval per read.
    struct ScriptedSource {
        script: std::vec::IntoIter<Result<f32, ()>>,
        now: Instant,
        interval: Duration,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<f32, ()>>) -> Self {
            Self {
                script: script.into_iter(),
                now: Instant::now(),
                interval: Duration::from_millis(1000),
            }
        }
    }

    #[async_trait]
    impl UtilizationSource for ScriptedSource {
        async fn read(&mut self) -> Result<UtilizationSample, SourceUnavailable> {
            self.now += self.interval;
            match self.script.next() {
                Some(Ok(utilization)) => Ok(UtilizationSample {
                    gpu_percent: Some(utilization),
                    cpu_percent: 5.0,
                    timestamp: self.now,
                    gpu_available: true,
                }),
                Some(Err(())) => Err(SourceUnavailable::new("scripted outage")),
                None => Err(SourceUnavailable::new("script exhausted")),
            }
        }
    }

    async fn run_script(script: Vec<Result<f32, ()>>) -> Vec<SessionEvent> {
        let detector = ActivityDetector::new(DetectorConfig::default()).unwrap();
        let (sink, mut rx) = ChannelSink::new();
        let cancel_token = CancellationToken::new();
        let ticks = script.len();

        let handle = tokio::spawn(monitor_loop(
            detector,
            ScriptedSource::new(script),
            Arc::new(sink),
            cancel_token.clone(),
        ));

        // One tick per script entry, plus the interval's immediate first tick.
        tokio::time::sleep(Duration::from_millis(1000 * ticks as u64 + 500)).await;
        cancel_token.cancel();
        handle.await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn full_session_produces_start_and_end() {
        let mut script: Vec<Result<f32, ()>> = vec![Ok(90.0); 3];
        script.extend(vec![Ok(20.0); 12]);

        let events = run_script(script).await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SessionEvent::GameStarted { .. }));
        assert!(events[1].is_game_ended());
    }

    #[tokio::test(start_paused = true)]
    async fn source_outage_skips_ticks_without_resetting_state() {
        let mut script: Vec<Result<f32, ()>> = vec![Ok(90.0); 2];
        script.extend(vec![Err(()); 7]);
        script.extend(vec![Ok(90.0); 2]);
        script.extend(vec![Ok(20.0); 12]);

        let events = run_script(script).await;

        // The outage neither emits anything nor forces a transition; the
        // session still ends exactly once afterwards.
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SessionEvent::GameStarted { .. }));
        assert!(events[1].is_game_ended());
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_readings_emit_nothing() {
        let events = run_script(vec![Ok(10.0); 8]).await;

        assert!(events.is_empty());
    }
}
