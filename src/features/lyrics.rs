//! Lyrics module - parsing, loading and playback sync
//!
//! - `parser`: LRC parsing into time-ordered cues
//! - `sync`: active cue resolution with change detection
//! - `loader`: ticketed lyric file loading

pub mod loader;
pub mod parser;
pub mod sync;

// Re-export commonly used items
pub use loader::{LyricRequest, LyricsSource, LyricsTicket};
pub use parser::*;
pub use sync::{CueChange, LyricSync, resolve_active_cue};
