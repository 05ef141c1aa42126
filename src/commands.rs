//! Command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal music player with synchronized lyrics and an offline asset cache.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Play(PlayCommand),
    Fetch(FetchCommand),
    Lyrics(LyricsCommand),
}

/// Plays a playlist with synchronized lyrics, controlled from stdin.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PlayCommand {
    /// Playlist JSON file (array of tracks)
    #[arg(value_name = "PLAYLIST")]
    pub playlist: PathBuf,

    /// Load lyrics from this origin through the offline cache instead of
    /// from files next to the playlist
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    /// Assumed length of every track in seconds
    #[arg(long, value_name = "SECS", default_value_t = 180.0)]
    pub track_length: f64,

    /// Media clock interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 250)]
    pub tick_ms: u64,

    /// Keep cached assets in memory only
    #[arg(long, default_value_t = false)]
    pub memory_cache: bool,

    /// Do not read or write saved preferences
    #[arg(long, default_value_t = false)]
    pub no_save: bool,
}

/// Fetches assets through the offline cache and reports where each came from.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    /// Paths or URLs to fetch, relative to the origin
    #[arg(value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// Origin the cache serves
    #[arg(long, value_name = "URL", default_value = "http://localhost:8080/")]
    pub origin: String,

    /// Precache the app shell before fetching
    #[arg(long, default_value_t = false)]
    pub precache: bool,

    /// Keep cached assets in memory only
    #[arg(long, default_value_t = false)]
    pub memory_cache: bool,
}

/// Parses an LRC file and prints its cues.
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct LyricsCommand {
    /// LRC file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Mark the line active at this time (seconds)
    #[arg(long, value_name = "SECS")]
    pub at: Option<f64>,

    /// Print the cues back as normalized LRC
    #[arg(long, default_value_t = false)]
    pub lrc: bool,
}
