//! Presentation layer
//!
//! The player never touches an output device directly: everything it wants
//! shown goes through a `Renderer`. The terminal implementation lives in
//! `console`.

pub mod console;

pub use console::ConsoleRenderer;

use crate::app::RepeatMode;
use crate::features::lyrics::{Cue, CueChange};
use crate::features::{Playlist, Track};

/// Rendering collaborator injected into the player controller
pub trait Renderer {
    /// Track metadata, cover and playlist highlight
    fn render_track(&mut self, index: usize, track: &Track, playlist: &Playlist);
    /// Play/pause indicator
    fn render_play_state(&mut self, is_playing: bool);
    /// Shuffle and repeat buttons
    fn render_controls(&mut self, is_shuffle: bool, repeat_mode: RepeatMode);
    /// Elapsed time; `duration` is `None` until metadata arrives
    fn render_progress(&mut self, position: f64, duration: Option<f64>);
    fn render_duration(&mut self, duration: f64);
    fn render_volume(&mut self, volume: f32);
    /// Placeholder shown while a lyric file is in flight
    fn render_lyrics_loading(&mut self);
    /// Placeholder shown when a lyric file failed to load
    fn render_lyrics_unavailable(&mut self);
    fn render_lyrics(&mut self, cues: &[Cue]);
    /// Move the highlight; only called when the active cue changes
    fn highlight_cue(&mut self, change: CueChange, cues: &[Cue]);
}
