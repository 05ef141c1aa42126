//! Lyrics parsing module
//!
//! Supports the standard LRC format: one `[mm:ss.xx]text` cue per line.

mod lrc;
mod types;

pub use lrc::stringify_lrc;
pub use types::*;

use std::path::Path;

/// Parse lyrics from string content
pub fn parse_lyrics(content: &str) -> Vec<Cue> {
    lrc::parse_lrc(content)
}

/// Parse lyrics from file
pub fn parse_lyrics_file(path: &Path) -> std::io::Result<Vec<Cue>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_lyrics(&content))
}
