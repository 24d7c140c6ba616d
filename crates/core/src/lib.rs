//! Core types and shared functionality for blogvault.
//!
//! This crate provides:
//! - The persistent URL-to-file asset cache
//! - The fetcher capability the cache retrieves bytes through
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    AssetCache, AssetReference, CacheIndex, ConversionError, FetchError, Fetched, Fetcher, FormatConverter,
    JpegNormalizer, Normalization,
};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
