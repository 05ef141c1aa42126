//! Bucketed response storage
//!
//! Two backends: an in-memory map for tests and short-lived sessions, and a
//! disk layout with one directory per bucket.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::response::AssetResponse;

/// Named buckets of responses keyed by request URL
pub trait CacheStorage: Send + Sync {
    /// Names of all existing buckets
    fn bucket_names(&self) -> Vec<String>;

    /// Entry in a specific bucket
    fn get(&self, bucket: &str, url: &str) -> Option<AssetResponse>;

    /// Store (or replace) an entry, creating the bucket if needed
    fn put(&self, bucket: &str, response: AssetResponse) -> Result<(), CacheError>;

    /// Delete a whole bucket. Returns whether it existed.
    fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError>;

    /// Search every bucket for a URL
    fn lookup(&self, url: &str) -> Option<AssetResponse> {
        self.bucket_names()
            .iter()
            .find_map(|bucket| self.get(bucket, url))
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    buckets: RwLock<BTreeMap<String, HashMap<String, AssetResponse>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryStorage {
    fn bucket_names(&self) -> Vec<String> {
        self.buckets.read().keys().cloned().collect()
    }

    fn get(&self, bucket: &str, url: &str) -> Option<AssetResponse> {
        self.buckets.read().get(bucket)?.get(url).cloned()
    }

    fn put(&self, bucket: &str, response: AssetResponse) -> Result<(), CacheError> {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(response.url.clone(), response);
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError> {
        Ok(self.buckets.write().remove(bucket).is_some())
    }
}

/// On-disk storage
///
/// Layout: `<root>/<bucket>/<xxh3(url)>.json` holds status and headers,
/// `<root>/<bucket>/<xxh3(url)>.body` the raw bytes.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    headers: Vec<(String, String)>,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage under the user cache directory
    pub fn in_user_cache() -> Self {
        Self::new(crate::utils::cache_dir().join("offline"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    fn entry_stem(url: &str) -> String {
        format!("{:016x}", xxhash_rust::xxh3::xxh3_64(url.as_bytes()))
    }

    fn read_entry(dir: &Path, stem: &str) -> Option<AssetResponse> {
        let meta = fs::read_to_string(dir.join(format!("{}.json", stem))).ok()?;
        let meta: EntryMeta = match serde_json::from_str(&meta) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Corrupt cache metadata {:?}/{}: {}", dir, stem, e);
                return None;
            }
        };
        let body = fs::read(dir.join(format!("{}.body", stem))).ok()?;

        Some(AssetResponse {
            url: meta.url,
            status: meta.status,
            headers: meta.headers,
            body,
        })
    }
}

impl CacheStorage for DiskStorage {
    fn bucket_names(&self) -> Vec<String> {
        let read_dir = match fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(_) => return Vec::new(),
        };

        let mut names: Vec<String> = read_dir
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    fn get(&self, bucket: &str, url: &str) -> Option<AssetResponse> {
        let entry = Self::read_entry(&self.bucket_dir(bucket), &Self::entry_stem(url))?;
        // Guard against hash collisions
        (entry.url == url).then_some(entry)
    }

    fn put(&self, bucket: &str, response: AssetResponse) -> Result<(), CacheError> {
        let dir = self.bucket_dir(bucket);
        fs::create_dir_all(&dir).map_err(|e| CacheError::Io(e.to_string()))?;

        let stem = Self::entry_stem(&response.url);
        let meta = EntryMeta {
            url: response.url,
            status: response.status,
            headers: response.headers,
        };
        let meta = serde_json::to_string(&meta).map_err(|e| CacheError::Io(e.to_string()))?;

        // Body first so a readable .json always has its body beside it
        fs::write(dir.join(format!("{}.body", stem)), &response.body)
            .map_err(|e| CacheError::Io(e.to_string()))?;
        fs::write(dir.join(format!("{}.json", stem)), meta)
            .map_err(|e| CacheError::Io(e.to_string()))?;
        Ok(())
    }

    fn delete_bucket(&self, bucket: &str) -> Result<bool, CacheError> {
        let dir = self.bucket_dir(bucket);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir).map_err(|e| CacheError::Io(e.to_string()))?;
        Ok(true)
    }
}

/// Cache operation errors
#[derive(Debug, Clone)]
pub enum CacheError {
    Io(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::Io(e) => write!(f, "Cache IO error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}
