use log::warn;
use rodio::{OutputStream, Sink, Source};
use std::f32::consts::PI;
use std::thread;
use std::time::Duration;

const TONE_FREQ_HZ: f32 = 900.0;
const TONE_DURATION_MS: u64 = 180;

/// Short end-of-session chime.
pub struct Chime;

impl Chime {
    pub fn new() -> Self {
        Self
    }

    /// Play the tone. Playback failures are logged, never propagated.
    pub fn play(&self) {
        // Dedicated thread holding the non-Send audio objects; playback blocks
        // until the tone finishes.
        let spawned = thread::Builder::new()
            .name("chime".to_string())
            .spawn(|| {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(err) => {
                        warn!("failed to open audio output: {err}");
                        return;
                    }
                };
                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(err) => {
                        warn!("failed to create audio sink: {err}");
                        return;
                    }
                };
                sink.append(ChimeTone::new());
                sink.sleep_until_end();
            });

        if let Err(err) = spawned {
            warn!("failed to spawn chime thread: {err}");
        }
    }
}

/// Fixed-length sine tone.
struct ChimeTone {
    sample_rate: u32,
    num_sample: usize,
    total_samples: usize,
}

impl ChimeTone {
    fn new() -> Self {
        let sample_rate = 44100;
        Self {
            sample_rate,
            num_sample: 0,
            total_samples: (sample_rate as u64 * TONE_DURATION_MS / 1000) as usize,
        }
    }
}

impl Iterator for ChimeTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;

        let t = self.num_sample as f32 / self.sample_rate as f32;

        Some((2.0 * PI * TONE_FREQ_HZ * t).sin() * 0.15) // Lower amplitude to prevent clipping
    }
}

impl Source for ChimeTone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(TONE_DURATION_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_is_finite_and_bounded() {
        let tone = ChimeTone::new();
        let samples: Vec<f32> = tone.collect();

        assert_eq!(samples.len(), (44100 * TONE_DURATION_MS / 1000) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.1501));
    }
}
