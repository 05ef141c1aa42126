//! Lyric file loading
//!
//! Lyric loads are asynchronous and may finish out of order. Each request
//! carries a ticket; the player drops results whose ticket is no longer
//! current.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::cache::{Fetcher, OfflineCache, ResponseSource};

/// Identifies one lyric load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LyricsTicket {
    /// Track the load was issued for
    pub track_index: usize,
    /// Monotonic counter, bumped on every track load
    pub generation: u64,
}

/// A lyric file the player wants loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricRequest {
    pub ticket: LyricsTicket,
    pub path: String,
}

/// Where lyric files come from
pub enum LyricsSource<F> {
    /// Relative to a local directory
    Local(PathBuf),
    /// Through the offline cache (network-first for `.lrc`)
    Remote(Arc<OfflineCache<F>>),
}

impl<F: Fetcher> LyricsSource<F> {
    /// Fetch the raw lyric text for a request
    pub async fn load(&self, path: &str) -> Result<String> {
        match self {
            LyricsSource::Local(base) => {
                let file = base.join(path);
                tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Failed to read lyrics {:?}", file))
            }
            LyricsSource::Remote(cache) => {
                let url = cache.resolve(path)?;
                let served = cache.handle_fetch(&url).await?;
                if served.source == ResponseSource::Offline || !served.response.is_ok() {
                    bail!("Lyrics not found: {} (status {})", url, served.response.status);
                }
                tracing::debug!("Lyrics {} served from {}", url, served.source);
                Ok(served.response.text())
            }
        }
    }
}
