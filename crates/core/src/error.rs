//! Unified error types for blogvault.
//!
//! Display strings carry a stable code prefix so callers can log and match
//! on them without depending on the variant layout.

use std::path::PathBuf;

use crate::cache::FetchError;

/// Unified error types for the asset cache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty resource identifier).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The index file exists but its contents cannot be trusted.
    #[error("CORRUPT_INDEX: {}: {reason}", path.display())]
    CorruptIndex { path: PathBuf, reason: String },

    /// The fetcher capability failed. Passed through unchanged.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Prefixing could not produce a unique filename within filesystem limits.
    #[error("NAME_EXHAUSTED: {0}")]
    NameExhausted(String),

    /// Filesystem operation failed.
    #[error("IO_ERROR: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io { context: context.into(), source }
    }

    /// Whether the failure concerns only the resource identifier being processed.
    ///
    /// A scraping run should skip the current item on these and keep going;
    /// anything else means the cache itself is unusable.
    pub fn is_per_item(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::Fetch(_) | Error::NameExhausted(_))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::io("blocking task", std::io::Error::other(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CorruptIndex { path: PathBuf::from("cache/cache.json"), reason: "expected value".to_string() };
        assert!(err.to_string().contains("CORRUPT_INDEX"));
        assert!(err.to_string().contains("cache/cache.json"));
    }

    #[test]
    fn test_fetch_error_is_transparent() {
        let err: Error = FetchError::NotFound { id: "https://x/a.jpg".to_string() }.into();
        assert_eq!(err.to_string(), "NOT_FOUND: https://x/a.jpg");
    }

    #[test]
    fn test_per_item_classification() {
        let fetch: Error = FetchError::Status { id: "https://x/a.jpg".to_string(), status: 500 }.into();
        assert!(fetch.is_per_item());
        assert!(Error::InvalidInput("empty".to_string()).is_per_item());

        let corrupt = Error::CorruptIndex { path: PathBuf::from("cache.json"), reason: "bad".to_string() };
        assert!(!corrupt.is_per_item());
        assert!(!Error::io("write", std::io::Error::other("disk full")).is_per_item());
    }
}
