//! Audio event types
//!
//! `AudioEvent`s flow from the media clock to the player; they are delivered
//! at the clock's own cadence, not on a fixed timer. Every event names the
//! source it was produced for, so events still queued when the source is
//! replaced can be told apart from events of the new one.

/// Identifies one loaded source; bumped by every `AudioOutput::load`
pub type SourceId = u64;

/// Events sent from the audio output to the player
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Duration became known (seconds)
    MetadataLoaded { source: SourceId, duration: f64 },
    /// Playback position advanced (seconds)
    TimeUpdate { source: SourceId, position: f64 },
    /// Natural end of stream
    Ended { source: SourceId },
    /// An asynchronous play request was rejected
    PlaybackFailed { source: SourceId, reason: String },
}

impl AudioEvent {
    /// Source the event belongs to
    pub fn source(&self) -> SourceId {
        match self {
            AudioEvent::MetadataLoaded { source, .. }
            | AudioEvent::TimeUpdate { source, .. }
            | AudioEvent::Ended { source }
            | AudioEvent::PlaybackFailed { source, .. } => *source,
        }
    }
}

/// Synchronous playback start failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The platform refused to start playback
    Rejected(String),
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::Rejected(e) => write!(f, "Playback rejected: {}", e),
        }
    }
}

impl std::error::Error for PlaybackError {}
