//! Request routing: which bucket and which strategy serve a path

/// App shell bucket, also holds lyric files
pub const STATIC_CACHE_NAME: &str = "static-v1";
/// Audio media bucket
pub const MUSIC_CACHE_NAME: &str = "music-v1";
/// Everything else
pub const CACHE_NAME: &str = "glass-music-player-v1";

/// Buckets that survive activation
pub const KNOWN_BUCKETS: [&str; 3] = [STATIC_CACHE_NAME, MUSIC_CACHE_NAME, CACHE_NAME];

/// App shell paths fetched on install
pub const STATIC_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./script.js",
    "./manifest.json",
];

const SHELL_EXTENSIONS: &[&str] = &["html", "css", "js", "json", "woff", "woff2", "ttf", "eot"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac"];
const LYRICS_EXTENSIONS: &[&str] = &["lrc"];

/// Asset classes recognised by the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    AppShell,
    Audio,
    Lyrics,
    Other,
}

/// Retrieval strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve the cached copy, fall back to network on miss
    CacheFirst,
    /// Prefer a fresh network copy, fall back to cache when offline
    NetworkFirst,
}

impl AssetClass {
    /// Classify a same-origin request path
    pub fn from_path(path: &str) -> Self {
        if path.is_empty() || path == "/" {
            return AssetClass::AppShell;
        }

        let Some(ext) = extension(path) else {
            return AssetClass::Other;
        };

        if SHELL_EXTENSIONS.contains(&ext.as_str()) {
            AssetClass::AppShell
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            AssetClass::Audio
        } else if LYRICS_EXTENSIONS.contains(&ext.as_str()) {
            AssetClass::Lyrics
        } else {
            AssetClass::Other
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            AssetClass::AppShell | AssetClass::Audio => Strategy::CacheFirst,
            AssetClass::Lyrics | AssetClass::Other => Strategy::NetworkFirst,
        }
    }

    pub fn bucket(&self) -> &'static str {
        match self {
            AssetClass::AppShell | AssetClass::Lyrics => STATIC_CACHE_NAME,
            AssetClass::Audio => MUSIC_CACHE_NAME,
            AssetClass::Other => CACHE_NAME,
        }
    }
}

/// Lowercased extension of the last path segment
fn extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether a bucket name belongs to the current cache version
pub fn is_known_bucket(name: &str) -> bool {
    KNOWN_BUCKETS.contains(&name)
}
