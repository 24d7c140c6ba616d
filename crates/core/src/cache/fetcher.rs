//! The fetcher capability the cache retrieves remote bytes through.
//!
//! The cache never talks to the network itself. Callers hand it a [`Fetcher`]
//! and the cache decides when (and whether) to call it.

use async_trait::async_trait;
use bytes::Bytes;

/// Bytes retrieved for a resource identifier, plus optional naming hints.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    /// Raw body bytes.
    pub bytes: Bytes,
    /// Filename suggested by the source (e.g. `Content-Disposition`).
    pub name: Option<String>,
    /// Extension suggested by the source (e.g. from `Content-Type`), without the dot.
    pub extension: Option<String>,
}

impl Fetched {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into(), name: None, extension: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

/// Errors reported by a [`Fetcher`].
///
/// The cache propagates these verbatim and never retries.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The resource does not exist (404-class response).
    #[error("NOT_FOUND: {id}")]
    NotFound { id: String },

    /// Any other unsuccessful status.
    #[error("HTTP_ERROR: {id} returned status {status}")]
    Status { id: String, status: u16 },

    /// The body exceeds the configured limit.
    #[error("FETCH_TOO_LARGE: {id}: {size} bytes exceeds {limit}")]
    TooLarge { id: String, size: u64, limit: u64 },

    /// The identifier cannot be fetched at all.
    #[error("INVALID_URL: {id}: {reason}")]
    InvalidUrl { id: String, reason: String },

    /// Transport failure (DNS, connect, TLS, timeout, truncated body).
    #[error("FETCH_FAILED: {id}: {source}")]
    Transport {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FetchError {
    /// The identifier the failure refers to.
    pub fn id(&self) -> &str {
        match self {
            FetchError::NotFound { id }
            | FetchError::Status { id, .. }
            | FetchError::TooLarge { id, .. }
            | FetchError::InvalidUrl { id, .. }
            | FetchError::Transport { id, .. } => id,
        }
    }
}

/// Caller-supplied capability that retrieves the bytes behind an identifier.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Fetched, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_builder() {
        let fetched = Fetched::new(vec![1u8, 2, 3]).with_name("IMG_1.jpg").with_extension("jpg");
        assert_eq!(fetched.bytes.len(), 3);
        assert_eq!(fetched.name.as_deref(), Some("IMG_1.jpg"));
        assert_eq!(fetched.extension.as_deref(), Some("jpg"));
    }

    #[test]
    fn test_fetch_error_id() {
        let err = FetchError::TooLarge { id: "https://x/big.png".to_string(), size: 10, limit: 5 };
        assert_eq!(err.id(), "https://x/big.png");
        assert!(err.to_string().contains("FETCH_TOO_LARGE"));
    }
}
