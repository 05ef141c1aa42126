//! Terminal renderer
//!
//! Prints player updates as plain lines. Lyrics are shown as a small window
//! around the active line so it always sits in the middle.

use std::io::Write;

use crate::app::RepeatMode;
use crate::features::lyrics::{Cue, CueChange};
use crate::features::{Playlist, Track};
use crate::utils::format_time;

use super::Renderer;

/// Lines shown on each side of the active lyric line
pub const LYRIC_CONTEXT: usize = 2;

/// Renderer writing to any `Write` sink (stdout by default)
pub struct ConsoleRenderer<W: Write = std::io::Stdout> {
    out: W,
    duration: Option<f64>,
    /// Last printed progress text, to print only on change
    last_progress: Option<String>,
}

impl ConsoleRenderer {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            duration: None,
            last_progress: None,
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

/// Window of cue indices centered on `active`
pub fn lyric_window(len: usize, active: usize) -> std::ops::Range<usize> {
    let start = active.saturating_sub(LYRIC_CONTEXT);
    let end = (active + LYRIC_CONTEXT + 1).min(len);
    start..end
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render_track(&mut self, index: usize, track: &Track, playlist: &Playlist) {
        self.duration = None;
        self.last_progress = None;
        self.line("");
        self.line(&format!(
            "♪ [{}/{}] {}",
            index + 1,
            playlist.len(),
            track.display_name()
        ));
        if let Some(cover) = &track.cover_path {
            self.line(&format!("  cover: {}", cover));
        }
    }

    fn render_play_state(&mut self, is_playing: bool) {
        self.line(if is_playing { "▶ playing" } else { "⏸ paused" });
    }

    fn render_controls(&mut self, is_shuffle: bool, repeat_mode: RepeatMode) {
        let shuffle = if is_shuffle { "on" } else { "off" };
        self.line(&format!("  shuffle: {} | {}", shuffle, repeat_mode));
    }

    fn render_progress(&mut self, position: f64, duration: Option<f64>) {
        if duration.is_some() {
            self.duration = duration;
        }
        let total = self.duration.map(format_time).unwrap_or_else(|| "-:--".to_string());
        let text = format!("  {} / {}", format_time(position), total);
        // Time updates arrive several times a second; only whole seconds matter
        if self.last_progress.as_deref() == Some(text.as_str()) {
            return;
        }
        self.line(&text);
        self.last_progress = Some(text);
    }

    fn render_duration(&mut self, duration: f64) {
        self.duration = Some(duration);
        self.line(&format!("  length: {}", format_time(duration)));
    }

    fn render_volume(&mut self, volume: f32) {
        self.line(&format!("  volume: {:.0}%", volume * 100.0));
    }

    fn render_lyrics_loading(&mut self) {
        self.line("  (loading lyrics...)");
    }

    fn render_lyrics_unavailable(&mut self) {
        self.line("  (lyrics unavailable)");
    }

    fn render_lyrics(&mut self, cues: &[Cue]) {
        if cues.is_empty() {
            self.line("  (no timed lyrics)");
        } else {
            self.line(&format!("  {} lyric lines", cues.len()));
        }
    }

    fn highlight_cue(&mut self, change: CueChange, cues: &[Cue]) {
        let Some(active) = change.current else {
            return;
        };
        self.line("  ---");
        for i in lyric_window(cues.len(), active) {
            let marker = if i == active { ">" } else { " " };
            let text = format!("  {} {}", marker, cues[i].text);
            self.line(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(renderer: ConsoleRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.out).unwrap()
    }

    #[test]
    fn test_lyric_window() {
        assert_eq!(lyric_window(10, 0), 0..3);
        assert_eq!(lyric_window(10, 5), 3..8);
        assert_eq!(lyric_window(10, 9), 7..10);
        assert_eq!(lyric_window(1, 0), 0..1);
    }

    #[test]
    fn test_progress_printed_once_per_second() {
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.render_progress(1.1, Some(60.0));
        renderer.render_progress(1.6, None);
        renderer.render_progress(2.0, None);
        assert_eq!(output(renderer), "  0:01 / 1:00\n  0:02 / 1:00\n");
    }

    #[test]
    fn test_highlight_marks_active_line() {
        let cues = vec![Cue::new(0.0, "a"), Cue::new(1.0, "b"), Cue::new(2.0, "c")];
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.highlight_cue(
            CueChange {
                previous: None,
                current: Some(1),
            },
            &cues,
        );
        assert_eq!(output(renderer), "  ---\n    a\n  > b\n    c\n");
    }

    #[test]
    fn test_highlight_cleared_prints_nothing() {
        let cues = vec![Cue::new(5.0, "a")];
        let mut renderer = ConsoleRenderer::new(Vec::new());
        renderer.highlight_cue(
            CueChange {
                previous: Some(0),
                current: None,
            },
            &cues,
        );
        assert!(output(renderer).is_empty());
    }
}
