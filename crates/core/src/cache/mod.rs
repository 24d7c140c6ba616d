//! Persistent URL-to-file asset cache.
//!
//! A cache root holds a JSON index (`cache.json` by default) and a flat
//! `images/` directory. It supports:
//!
//! - Fetch-through resolution of remote identifiers to unique local filenames
//! - Self-healing of entries whose file was deleted behind the cache's back
//! - Format normalization (HEIC → JPEG) with an explicit fallback branch
//! - Offline maintenance: predicate purges and full repair passes

pub mod assets;
pub mod convert;
pub mod fetcher;
pub mod hash;
pub mod index;
pub mod naming;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::Error;

pub use assets::{AssetReference, Normalization};
pub use convert::{ConversionError, FormatConverter, JpegNormalizer};
pub use fetcher::{FetchError, Fetched, Fetcher};
pub use index::{CacheIndex, DEFAULT_INDEX_FILE};
pub use store::{AssetCache, IMAGES_DIR};
