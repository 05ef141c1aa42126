//! Audio playback module
//!
//! The player drives audio through the `AudioOutput` trait and hears back
//! through `AudioEvent`s:
//! - `events`: notifications from the media clock (time updates, end of stream)
//! - `clock`: a simulated output that advances a position without decoding

pub mod clock;
pub mod events;

pub use clock::{SimulatedAudio, run_media_clock};
pub use events::{AudioEvent, PlaybackError, SourceId};

/// Control surface of an audio element
pub trait AudioOutput {
    /// Replace the source. Stops playback and rewinds to 0. Events queued
    /// for the previous source keep its id; the new id is returned.
    fn load(&mut self, source: &str) -> SourceId;

    /// Start or resume playback. May be refused (autoplay policy, decode
    /// error); later failures arrive as `AudioEvent::PlaybackFailed`.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// Set the position in seconds
    fn seek(&mut self, position: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Duration in seconds, once metadata is known
    fn duration(&self) -> Option<f64>;

    /// Volume (0.0 to 1.0)
    fn set_volume(&mut self, volume: f32);
}
