//! HTTP fetcher for the asset cache.
//!
//! ### Request
//! - Only `http`/`https` identifiers are fetched; the cache key stays verbatim
//! - Max redirects: 5
//! - Max body bytes: 25MB (configurable)
//!
//! ### Status mapping
//! - 404/410 → `FetchError::NotFound`
//! - any other non-success → `FetchError::Status`
//!
//! ### Naming hints
//! - `Content-Disposition` filename, then an extension from `Content-Type`

pub mod headers;
pub mod url;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use blogvault_core::{AppConfig, FetchError, Fetched, Fetcher};

pub use headers::{content_type_extension, disposition_filename};
pub use url::{UrlError, has_extension, is_image_url, parse_remote};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "blogvault/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 25MB)
    pub max_bytes: usize,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "blogvault/0.1".to_string(),
            max_bytes: 25 * 1024 * 1024,
            timeout: Duration::from_millis(30_000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// [`Fetcher`] that downloads assets over HTTP(S).
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn too_large(&self, id: &str, size: u64) -> FetchError {
        FetchError::TooLarge { id: id.to_string(), size, limit: self.config.max_bytes as u64 }
    }
}

fn transport(id: &str, err: reqwest::Error) -> FetchError {
    FetchError::Transport { id: id.to_string(), source: Box::new(err) }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &str) -> Result<Fetched, FetchError> {
        let start = Instant::now();
        let url =
            parse_remote(id).map_err(|e| FetchError::InvalidUrl { id: id.to_string(), reason: e.to_string() })?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "image/avif,image/webp,image/*,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| transport(id, e))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(FetchError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(FetchError::Status { id: id.to_string(), status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len > self.config.max_bytes as u64
        {
            return Err(self.too_large(id, len));
        }

        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(|e| transport(id, e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(id, bytes.len() as u64));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(id, size = bytes.len(), fetch_ms, "fetched asset");

        Ok(Fetched { bytes, name: disposition_filename(&headers), extension: content_type_extension(&headers) })
    }
}
