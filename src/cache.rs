//! Offline asset cache
//!
//! Intercepts same-origin requests and answers them from named buckets:
//! app shell and audio are cache-first, lyric files and everything else are
//! network-first. Cross-origin requests pass through untouched.

pub mod fetcher;
mod policy;
pub mod response;
mod storage;
mod worker;

pub use fetcher::{Fetcher, HttpFetcher};
pub use policy::STATIC_ASSETS;
pub use response::ResponseSource;
pub use storage::{CacheStorage, DiskStorage, MemoryStorage};
pub use worker::OfflineCache;
