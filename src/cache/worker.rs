//! Fetch interception with per-class caching strategies

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::join_all;
use reqwest::Url;
use tracing::{debug, info, warn};

use super::fetcher::{FetchError, Fetcher};
use super::policy::{AssetClass, STATIC_CACHE_NAME, Strategy, is_known_bucket};
use super::response::{AssetResponse, ResponseSource, Served};
use super::storage::{CacheError, CacheStorage};

const OFFLINE_MESSAGE: &str = "Offline";
const OFFLINE_NO_CACHE_MESSAGE: &str = "Offline, and no cached copy is available";

/// Offline asset cache for a single origin
pub struct OfflineCache<F> {
    origin: Url,
    fetcher: F,
    storage: Arc<dyn CacheStorage>,
    controlling: AtomicBool,
}

impl<F: Fetcher> OfflineCache<F> {
    pub fn new(origin: Url, fetcher: F, storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            origin,
            fetcher,
            storage,
            controlling: AtomicBool::new(false),
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve a path or absolute URL against the origin
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.origin
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Asset class for a request, `None` for cross-origin requests
    pub fn route(&self, url: &Url) -> Option<AssetClass> {
        if url.origin() != self.origin.origin() {
            return None;
        }
        Some(AssetClass::from_path(url.path()))
    }

    /// Serve a request according to its asset class
    ///
    /// Same-origin requests never fail: when neither network nor cache can
    /// answer, a synthetic 503 is returned. Cross-origin requests go straight
    /// to the network and their errors are returned as-is.
    pub async fn handle_fetch(&self, url: &Url) -> Result<Served, FetchError> {
        // The fragment never reaches the network or the cache key
        let url = &without_fragment(url);
        let Some(class) = self.route(url) else {
            debug!("Passing through cross-origin request {}", url);
            let response = self.fetcher.fetch(url).await?;
            return Ok(Served {
                response,
                source: ResponseSource::PassThrough,
            });
        };

        let served = match class.strategy() {
            Strategy::CacheFirst => self.cache_first(url, class.bucket()).await,
            Strategy::NetworkFirst => self.network_first(url, class.bucket()).await,
        };
        Ok(served)
    }

    async fn cache_first(&self, url: &Url, bucket: &str) -> Served {
        let key = url.to_string();
        if let Some(response) = self.storage.lookup(&key) {
            debug!("Cache hit {}", key);
            return Served {
                response,
                source: ResponseSource::Cache,
            };
        }

        match self.fetcher.fetch(url).await {
            Ok(response) => {
                self.store(bucket, &key, &response);
                Served {
                    response,
                    source: ResponseSource::Network,
                }
            }
            Err(e) => {
                warn!("Network request failed for {}: {}", key, e);
                Served {
                    response: AssetResponse::offline(key, OFFLINE_MESSAGE),
                    source: ResponseSource::Offline,
                }
            }
        }
    }

    async fn network_first(&self, url: &Url, bucket: &str) -> Served {
        let key = url.to_string();
        match self.fetcher.fetch(url).await {
            Ok(response) => {
                self.store(bucket, &key, &response);
                Served {
                    response,
                    source: ResponseSource::Network,
                }
            }
            Err(e) => {
                info!("Network failed for {} ({}), using cache", key, e);
                match self.storage.lookup(&key) {
                    Some(response) => Served {
                        response,
                        source: ResponseSource::Cache,
                    },
                    None => Served {
                        response: AssetResponse::offline(key, OFFLINE_NO_CACHE_MESSAGE),
                        source: ResponseSource::Offline,
                    },
                }
            }
        }
    }

    /// Store a copy of a successful response; failures only cost freshness
    fn store(&self, bucket: &str, key: &str, response: &AssetResponse) {
        if !response.is_ok() {
            return;
        }
        let mut copy = response.clone();
        copy.url = key.to_string();
        if let Err(e) = self.storage.put(bucket, copy) {
            warn!("Failed to cache {} in {}: {}", key, bucket, e);
        }
    }

    /// Precache the app shell
    ///
    /// All manifest entries must fetch with a 2xx status; otherwise nothing
    /// is stored and the install fails.
    pub async fn install(&self, manifest: &[&str]) -> Result<usize, InstallError> {
        info!("Installing offline cache ({} assets)", manifest.len());

        let urls = manifest
            .iter()
            .map(|path| {
                self.resolve(path)
                    .map(|url| without_fragment(&url))
                    .map_err(|error| InstallError::Fetch {
                        url: path.to_string(),
                        error,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let results = join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await;

        let mut responses = Vec::with_capacity(results.len());
        for (url, result) in urls.iter().zip(results) {
            let response = result.map_err(|error| InstallError::Fetch {
                url: url.to_string(),
                error,
            })?;
            if !response.is_ok() {
                return Err(InstallError::Status {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            responses.push((url.to_string(), response));
        }

        let count = responses.len();
        for (key, mut response) in responses {
            response.url = key;
            self.storage
                .put(STATIC_CACHE_NAME, response)
                .map_err(InstallError::Storage)?;
        }

        info!("Precached {} app shell assets", count);
        Ok(count)
    }

    /// Drop buckets from older cache versions and take control of clients
    ///
    /// Returns the names of the deleted buckets.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        let mut deleted = Vec::new();
        for name in self.storage.bucket_names() {
            if is_known_bucket(&name) {
                continue;
            }
            info!("Deleting stale cache bucket: {}", name);
            if self.storage.delete_bucket(&name)? {
                deleted.push(name);
            }
        }

        self.controlling.store(true, Ordering::Release);
        Ok(deleted)
    }

    /// Whether `activate` has completed
    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::Acquire)
    }
}

/// Requests are fetched and cached by their URL without the fragment
fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Install (precache) failures
#[derive(Debug, Clone)]
pub enum InstallError {
    Fetch { url: String, error: FetchError },
    Status { url: String, status: u16 },
    Storage(CacheError),
}

impl std::fmt::Display for InstallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallError::Fetch { url, error } => write!(f, "Precache of {} failed: {}", url, error),
            InstallError::Status { url, status } => {
                write!(f, "Precache of {} returned status {}", url, status)
            }
            InstallError::Storage(e) => write!(f, "Precache storage failed: {}", e),
        }
    }
}

impl std::error::Error for InstallError {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;
    use crate::cache::policy::{CACHE_NAME, MUSIC_CACHE_NAME, STATIC_ASSETS};
    use crate::cache::response::OFFLINE_STATUS;
    use crate::cache::storage::MemoryStorage;

    /// Scripted network: unknown URLs fail as if offline
    #[derive(Default)]
    struct MockFetcher {
        responses: Mutex<HashMap<String, (u16, String)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn serve(&self, url: &str, status: u16, body: &str) {
            self.responses
                .lock()
                .insert(url.to_string(), (status, body.to_string()));
        }

        fn go_offline(&self) {
            self.responses.lock().clear();
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    impl Fetcher for Arc<MockFetcher> {
        async fn fetch(&self, url: &Url) -> Result<AssetResponse, FetchError> {
            self.calls.lock().push(url.to_string());
            match self.responses.lock().get(url.as_str()) {
                Some((status, body)) => Ok(AssetResponse::new(url.as_str(), *status, body.as_str())),
                None => Err(FetchError::Network("offline".into())),
            }
        }
    }

    fn setup() -> (OfflineCache<Arc<MockFetcher>>, Arc<MockFetcher>, Arc<MemoryStorage>) {
        let fetcher = Arc::new(MockFetcher::default());
        let storage = Arc::new(MemoryStorage::new());
        let cache = OfflineCache::new(
            Url::parse("http://player.local/").unwrap(),
            fetcher.clone(),
            storage.clone(),
        );
        (cache, fetcher, storage)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_cache_first_offline_without_entry() {
        let (cache, _, storage) = setup();
        let served = cache
            .handle_fetch(&url("http://player.local/music/a.mp3"))
            .await
            .unwrap();

        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, OFFLINE_STATUS);
        assert!(storage.bucket_names().is_empty());
    }

    #[tokio::test]
    async fn test_cache_first_stores_then_serves_from_cache() {
        let (cache, fetcher, storage) = setup();
        let song = "http://player.local/music/a.mp3";
        fetcher.serve(song, 200, "audio");

        let first = cache.handle_fetch(&url(song)).await.unwrap();
        assert_eq!(first.source, ResponseSource::Network);
        assert!(storage.get(MUSIC_CACHE_NAME, song).is_some());

        fetcher.go_offline();
        let second = cache.handle_fetch(&url(song)).await.unwrap();
        assert_eq!(second.source, ResponseSource::Cache);
        assert_eq!(second.response.body, b"audio");
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_first_does_not_store_errors() {
        let (cache, fetcher, storage) = setup();
        let page = "http://player.local/missing.html";
        fetcher.serve(page, 404, "not found");

        let served = cache.handle_fetch(&url(page)).await.unwrap();
        assert_eq!(served.response.status, 404);
        assert_eq!(served.source, ResponseSource::Network);
        assert!(storage.lookup(page).is_none());
    }

    #[tokio::test]
    async fn test_network_first_refreshes_and_falls_back() {
        let (cache, fetcher, storage) = setup();
        let lrc = "http://player.local/lrc/song.lrc";

        fetcher.serve(lrc, 200, "[00:01.00]v1");
        cache.handle_fetch(&url(lrc)).await.unwrap();
        fetcher.serve(lrc, 200, "[00:01.00]v2");
        let fresh = cache.handle_fetch(&url(lrc)).await.unwrap();
        assert_eq!(fresh.source, ResponseSource::Network);
        assert_eq!(storage.get(STATIC_CACHE_NAME, lrc).unwrap().text(), "[00:01.00]v2");

        fetcher.go_offline();
        let fallback = cache.handle_fetch(&url(lrc)).await.unwrap();
        assert_eq!(fallback.source, ResponseSource::Cache);
        assert_eq!(fallback.response.text(), "[00:01.00]v2");
    }

    #[tokio::test]
    async fn test_network_first_offline_without_entry() {
        let (cache, _, storage) = setup();
        let served = cache
            .handle_fetch(&url("http://player.local/cover/a.jpg"))
            .await
            .unwrap();

        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, OFFLINE_STATUS);
        assert_eq!(served.response.text(), OFFLINE_NO_CACHE_MESSAGE);
        assert!(storage.lookup("http://player.local/cover/a.jpg").is_none());
    }

    #[tokio::test]
    async fn test_other_assets_use_general_bucket() {
        let (cache, fetcher, storage) = setup();
        let cover = "http://player.local/cover/a.jpg";
        fetcher.serve(cover, 200, "jpeg");

        cache.handle_fetch(&url(cover)).await.unwrap();
        assert!(storage.get(CACHE_NAME, cover).is_some());
    }

    #[tokio::test]
    async fn test_fragment_is_ignored_for_cache_key() {
        let (cache, fetcher, storage) = setup();
        fetcher.serve("http://player.local/index.html", 200, "<html>");

        let served = cache
            .handle_fetch(&url("http://player.local/index.html#top"))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Network);
        assert_eq!(served.response.status, 200);
        assert_eq!(*fetcher.calls.lock(), vec!["http://player.local/index.html"]);
        assert!(storage.get(STATIC_CACHE_NAME, "http://player.local/index.html").is_some());

        // A different fragment hits the same entry
        let served = cache
            .handle_fetch(&url("http://player.local/index.html#bottom"))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cross_origin_passes_through() {
        let (cache, fetcher, storage) = setup();
        let font = "https://fonts.example.com/icons.woff2";
        fetcher.serve(font, 200, "font");

        let served = cache.handle_fetch(&url(font)).await.unwrap();
        assert_eq!(served.source, ResponseSource::PassThrough);
        assert!(storage.bucket_names().is_empty());

        fetcher.go_offline();
        assert!(cache.handle_fetch(&url(font)).await.is_err());
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let (cache, fetcher, storage) = setup();
        for path in STATIC_ASSETS.iter().skip(1) {
            let u = cache.resolve(path).unwrap();
            fetcher.serve(u.as_str(), 200, path);
        }

        // "./" is missing
        let err = cache.install(STATIC_ASSETS).await.unwrap_err();
        assert!(matches!(err, InstallError::Fetch { .. }));
        assert!(storage.bucket_names().is_empty());

        fetcher.serve("http://player.local/", 500, "boom");
        let err = cache.install(STATIC_ASSETS).await.unwrap_err();
        assert!(matches!(err, InstallError::Status { status: 500, .. }));
        assert!(storage.bucket_names().is_empty());

        fetcher.serve("http://player.local/", 200, "root");
        assert_eq!(cache.install(STATIC_ASSETS).await.unwrap(), STATIC_ASSETS.len());
        assert!(storage.get(STATIC_CACHE_NAME, "http://player.local/style.css").is_some());

        // Served from cache once installed
        fetcher.go_offline();
        let served = cache
            .handle_fetch(&url("http://player.local/script.js"))
            .await
            .unwrap();
        assert_eq!(served.source, ResponseSource::Cache);
    }

    #[test]
    fn test_activate_purges_stale_buckets() {
        let (cache, _, storage) = setup();
        for bucket in ["static-v0", STATIC_CACHE_NAME, MUSIC_CACHE_NAME, "music-v0"] {
            storage
                .put(bucket, AssetResponse::new("http://player.local/x", 200, "x"))
                .unwrap();
        }
        assert!(!cache.is_controlling());

        let mut deleted = cache.activate().unwrap();
        deleted.sort();
        assert_eq!(deleted, vec!["music-v0", "static-v0"]);
        assert_eq!(storage.bucket_names(), vec![MUSIC_CACHE_NAME, STATIC_CACHE_NAME]);
        assert!(cache.is_controlling());
    }

    #[test]
    fn test_route() {
        let (cache, _, _) = setup();
        assert_eq!(cache.route(&url("http://player.local/")), Some(AssetClass::AppShell));
        assert_eq!(cache.route(&url("http://player.local:8080/")), None);
        assert_eq!(cache.route(&url("https://player.local/")), None);
    }
}
