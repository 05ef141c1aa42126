//! Playlist configuration
//!
//! A playlist is a fixed, non-empty, ordered list of track descriptors read
//! from JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A single track descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Audio source path or URL
    #[serde(alias = "path")]
    pub audio_path: String,
    /// LRC file path or URL
    #[serde(alias = "lrc")]
    pub lyrics_path: String,
    /// Cover art path or URL
    #[serde(default, alias = "cover", skip_serializing_if = "Option::is_none")]
    pub cover_path: Option<String>,
}

impl Track {
    /// "Title - Artist"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// Ordered list of tracks, never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }
        Ok(Self { tracks })
    }

    /// Parse a JSON array of tracks
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json).context("Invalid playlist JSON")?;
        Ok(Self::new(tracks)?)
    }

    /// Load a playlist file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read playlist {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Failed to load playlist {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn last_index(&self) -> usize {
        self.tracks.len() - 1
    }

    /// Track at `index`, clamped into range
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index.min(self.last_index())]
    }
}

/// Playlist validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    Empty,
}

impl std::fmt::Display for PlaylistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaylistError::Empty => write!(f, "Playlist must contain at least one track"),
        }
    }
}

impl std::error::Error for PlaylistError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"title": "A", "artist": "X", "audioPath": "music/a.mp3", "lyricsPath": "lrc/a.lrc", "coverPath": "cover/a.jpg"},
            {"title": "B", "artist": "Y", "path": "music/b.mp3", "lrc": "lrc/b.lrc"}
        ]"#;
        let playlist = Playlist::from_json(json).unwrap();

        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.last_index(), 1);
        assert_eq!(playlist.track(0).cover_path.as_deref(), Some("cover/a.jpg"));
        assert_eq!(playlist.track(1).audio_path, "music/b.mp3");
        assert_eq!(playlist.track(1).lyrics_path, "lrc/b.lrc");
        assert_eq!(playlist.track(1).cover_path, None);
        assert_eq!(playlist.track(1).display_name(), "B - Y");
    }

    #[test]
    fn test_track_is_clamped() {
        let playlist = Playlist::from_json(
            r#"[{"title": "A", "artist": "X", "audioPath": "a.mp3", "lyricsPath": "a.lrc"}]"#,
        )
        .unwrap();
        assert_eq!(playlist.track(7).title, "A");
    }

    #[test]
    fn test_rejects_empty_and_incomplete() {
        assert!(Playlist::from_json("[]").is_err());
        assert!(Playlist::from_json(r#"[{"title": "A", "artist": "X"}]"#).is_err());
        assert_eq!(Playlist::new(Vec::new()).unwrap_err(), PlaylistError::Empty);
    }
}
