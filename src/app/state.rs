//! Playback state definitions

use crate::features::lyrics::LyricSync;

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Loop the whole playlist
    #[default]
    All,
    /// Repeat current song
    One,
    /// Stop after the last song
    Off,
}

impl RepeatMode {
    /// Get the next repeat mode in cycle order
    pub fn next(self) -> Self {
        match self {
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
            RepeatMode::Off => RepeatMode::All,
        }
    }

    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            RepeatMode::All => "Repeat all",
            RepeatMode::One => "Repeat one",
            RepeatMode::Off => "No repeat",
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Player state, mutated only by `PlayerController`
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub current_track_index: usize,
    pub is_playing: bool,
    pub is_shuffle: bool,
    pub repeat_mode: RepeatMode,
    /// Last highlighted cue, a cache of `(cues, position)`
    pub lyric_sync: LyricSync,
}

impl PlaybackState {
    pub fn new(current_track_index: usize) -> Self {
        Self {
            current_track_index,
            ..Default::default()
        }
    }
}
