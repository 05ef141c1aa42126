//! Player messages
//!
//! Every external event reaches the player as a `Message`: user actions,
//! audio clock notifications and finished lyric loads.

use crate::audio::AudioEvent;
use crate::features::Action;
use crate::features::lyrics::LyricsTicket;

/// Seconds skipped by the seek shortcuts
pub const SEEK_STEP: f64 = 5.0;
/// Volume change of the volume shortcuts
pub const VOLUME_STEP: f32 = 0.1;

/// Track navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Player messages
#[derive(Debug)]
pub enum Message {
    // ============ Playback ============
    /// Flip play/pause
    TogglePlay,
    /// Force play (`true`) or pause (`false`)
    SetPlaying(bool),
    Advance(Direction),
    ToggleShuffle,
    CycleRepeat,
    /// Playlist entry clicked
    SelectTrack(usize),

    // ============ Position ============
    /// Absolute seek (seconds)
    Seek(f64),
    /// Relative seek (seconds)
    SeekBy(f64),
    /// Lyric line clicked
    SeekToCue(usize),

    // ============ Volume ============
    SetVolume(f32),
    AdjustVolume(f32),

    // ============ Audio ============
    Audio(AudioEvent),

    // ============ Lyrics ============
    /// A lyric load finished
    LyricsLoaded {
        ticket: LyricsTicket,
        result: anyhow::Result<String>,
    },
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        match action {
            Action::PlayPause => Message::TogglePlay,
            Action::NextTrack => Message::Advance(Direction::Next),
            Action::PrevTrack => Message::Advance(Direction::Prev),
            Action::VolumeUp => Message::AdjustVolume(VOLUME_STEP),
            Action::VolumeDown => Message::AdjustVolume(-VOLUME_STEP),
            Action::SeekForward => Message::SeekBy(SEEK_STEP),
            Action::SeekBackward => Message::SeekBy(-SEEK_STEP),
            Action::ToggleShuffle => Message::ToggleShuffle,
            Action::CycleRepeat => Message::CycleRepeat,
        }
    }
}

impl From<AudioEvent> for Message {
    fn from(event: AudioEvent) -> Self {
        Message::Audio(event)
    }
}
