//! Lyrics data types

use std::sync::Arc;

/// A single timestamped lyric line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cue {
    /// Start time in seconds
    pub time: f64,
    /// Line text, already trimmed and never empty
    pub text: String,
}

impl Cue {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// Shared, immutable cue sequence.
///
/// Replaced as a whole when a new lyric file finishes loading.
pub type Cues = Arc<[Cue]>;

/// Empty cue sequence
pub fn no_cues() -> Cues {
    Arc::from(Vec::new())
}
