//! Stored and synthetic responses

/// Status of a synthetic "unavailable" response
pub const OFFLINE_STATUS: u16 = 503;

/// A response as seen by the cache: status, headers and body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Synthetic 503 returned when neither network nor cache can serve
    pub fn offline(url: impl Into<String>, message: &str) -> Self {
        let mut response = Self::new(url, OFFLINE_STATUS, message.as_bytes());
        response.headers.push((
            "content-type".to_string(),
            "text/plain; charset=utf-8".to_string(),
        ));
        response
    }

    /// 2xx status
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Where a served response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
    /// Synthetic unavailable response
    Offline,
    /// Cross-origin request forwarded untouched
    PassThrough,
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseSource::Cache => write!(f, "cache"),
            ResponseSource::Network => write!(f, "network"),
            ResponseSource::Offline => write!(f, "offline"),
            ResponseSource::PassThrough => write!(f, "pass-through"),
        }
    }
}

/// A response together with its source
#[derive(Debug, Clone)]
pub struct Served {
    pub response: AssetResponse,
    pub source: ResponseSource,
}
