//! Simulated audio output
//!
//! Advances a playback position in real time without decoding anything.
//! Every track is assumed to last `track_length` seconds.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{AudioEvent, AudioOutput, PlaybackError, SourceId};

#[derive(Debug)]
struct ClockState {
    source: Option<String>,
    generation: SourceId,
    position: f64,
    track_length: f64,
    playing: bool,
    metadata_sent: bool,
}

impl ClockState {
    /// Advance by `dt` seconds and collect the resulting events
    fn tick(&mut self, dt: f64) -> Vec<AudioEvent> {
        let mut events = Vec::new();
        let source = self.generation;
        let Some(path) = self.source.as_deref() else {
            return events;
        };

        // Nothing to decode: the play request fails once playback is attempted
        if path.is_empty() {
            if self.playing {
                self.playing = false;
                events.push(AudioEvent::PlaybackFailed {
                    source,
                    reason: "empty source".to_string(),
                });
            }
            return events;
        }

        if !self.metadata_sent {
            self.metadata_sent = true;
            events.push(AudioEvent::MetadataLoaded {
                source,
                duration: self.track_length,
            });
        }

        if !self.playing {
            return events;
        }

        self.position = (self.position + dt).min(self.track_length);
        events.push(AudioEvent::TimeUpdate {
            source,
            position: self.position,
        });

        if self.position >= self.track_length {
            self.playing = false;
            events.push(AudioEvent::Ended { source });
        }

        events
    }
}

/// Handle to the simulated output, cheap to clone
#[derive(Debug, Clone)]
pub struct SimulatedAudio {
    state: Arc<Mutex<ClockState>>,
}

impl SimulatedAudio {
    pub fn new(track_length: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState {
                source: None,
                generation: 0,
                position: 0.0,
                track_length: track_length.max(1.0),
                playing: false,
                metadata_sent: false,
            })),
        }
    }

    fn tick(&self, dt: f64) -> Vec<AudioEvent> {
        self.state.lock().tick(dt)
    }
}

impl AudioOutput for SimulatedAudio {
    fn load(&mut self, source: &str) -> SourceId {
        let mut state = self.state.lock();
        state.generation += 1;
        state.source = Some(source.to_string());
        state.position = 0.0;
        state.playing = false;
        state.metadata_sent = false;
        state.generation
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut state = self.state.lock();
        if state.source.is_none() {
            return Err(PlaybackError::Rejected("no source loaded".to_string()));
        }
        // Playing a finished stream starts it over
        if state.position >= state.track_length {
            state.position = 0.0;
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().playing = false;
    }

    fn seek(&mut self, position: f64) {
        let mut state = self.state.lock();
        state.position = position.clamp(0.0, state.track_length);
    }

    fn position(&self) -> f64 {
        self.state.lock().position
    }

    fn duration(&self) -> Option<f64> {
        let state = self.state.lock();
        state.metadata_sent.then_some(state.track_length)
    }

    fn set_volume(&mut self, volume: f32) {
        // Nothing to attenuate
        tracing::trace!("Simulated volume set to {:.2}", volume);
    }
}

/// Drive the simulated output in real time
///
/// Emits events every `interval` until `emit` returns `false`.
pub async fn run_media_clock<E>(audio: SimulatedAudio, interval: Duration, mut emit: E)
where
    E: FnMut(AudioEvent) -> bool,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last = tokio::time::Instant::now();

    loop {
        ticker.tick().await;
        let now = tokio::time::Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        for event in audio.tick(dt) {
            if !emit(event) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_events_without_source() {
        let audio = SimulatedAudio::new(10.0);
        assert!(audio.tick(1.0).is_empty());
    }

    #[test]
    fn test_metadata_then_time_updates() {
        let mut audio = SimulatedAudio::new(10.0);
        let source = audio.load("a.mp3");
        assert_eq!(audio.duration(), None);

        assert_eq!(
            audio.tick(0.25),
            vec![AudioEvent::MetadataLoaded {
                source,
                duration: 10.0
            }]
        );
        assert_eq!(audio.duration(), Some(10.0));

        audio.play().unwrap();
        assert_eq!(
            audio.tick(0.5),
            vec![AudioEvent::TimeUpdate {
                source,
                position: 0.5
            }]
        );
        assert_eq!(audio.position(), 0.5);
    }

    #[test]
    fn test_ends_at_track_length() {
        let mut audio = SimulatedAudio::new(2.0);
        let source = audio.load("a.mp3");
        audio.play().unwrap();
        audio.tick(1.5);

        let events = audio.tick(1.0);
        assert_eq!(
            events,
            vec![
                AudioEvent::TimeUpdate {
                    source,
                    position: 2.0
                },
                AudioEvent::Ended { source }
            ]
        );
        assert!(!audio.state.lock().playing);

        // Replaying a finished stream rewinds
        audio.play().unwrap();
        assert_eq!(audio.position(), 0.0);
    }

    #[test]
    fn test_play_without_source_is_rejected() {
        let mut audio = SimulatedAudio::new(2.0);
        assert!(audio.play().is_err());
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut audio = SimulatedAudio::new(5.0);
        audio.load("a.mp3");
        audio.seek(99.0);
        assert_eq!(audio.position(), 5.0);
        audio.seek(-1.0);
        assert_eq!(audio.position(), 0.0);
    }

    #[test]
    fn test_load_resets_position() {
        let mut audio = SimulatedAudio::new(5.0);
        audio.load("a.mp3");
        audio.play().unwrap();
        audio.tick(0.1);
        audio.tick(2.0);

        audio.load("b.mp3");
        assert_eq!(audio.position(), 0.0);
        assert!(!audio.state.lock().playing);
        assert_eq!(audio.duration(), None);
    }

    #[test]
    fn test_each_load_gets_a_new_source() {
        let mut audio = SimulatedAudio::new(5.0);
        let first = audio.load("a.mp3");
        let second = audio.load("b.mp3");
        assert_ne!(first, second);

        audio.play().unwrap();
        let events = audio.tick(0.5);
        assert!(!events.is_empty());
        assert!(events.iter().all(|event| event.source() == second));
    }

    #[test]
    fn test_empty_source_fails_after_play() {
        let mut audio = SimulatedAudio::new(5.0);
        let source = audio.load("");
        assert!(audio.tick(0.25).is_empty());

        // Accepted synchronously, refused once the clock runs
        audio.play().unwrap();
        assert_eq!(
            audio.tick(0.25),
            vec![AudioEvent::PlaybackFailed {
                source,
                reason: "empty source".to_string()
            }]
        );
        assert!(!audio.state.lock().playing);
        assert!(audio.tick(0.25).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_clock_emits_until_told_to_stop() {
        let mut audio = SimulatedAudio::new(1.0);
        let source = audio.load("a.mp3");
        audio.play().unwrap();

        let mut events = Vec::new();
        run_media_clock(audio.clone(), Duration::from_millis(250), |event| {
            let ended = matches!(event, AudioEvent::Ended { .. });
            events.push(event);
            !ended
        })
        .await;

        assert_eq!(
            events.first(),
            Some(&AudioEvent::MetadataLoaded {
                source,
                duration: 1.0
            })
        );
        assert_eq!(events.last(), Some(&AudioEvent::Ended { source }));
    }
}
