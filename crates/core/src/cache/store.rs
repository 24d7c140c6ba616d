//! Cache handle construction and directory layout.
//!
//! The cache root holds the index file and a flat `images/` directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::convert::{FormatConverter, JpegNormalizer};
use super::index::{CacheIndex, DEFAULT_INDEX_FILE};
use super::naming::DEFAULT_MAX_NAME_LEN;
use crate::{AppConfig, Error};

/// Name of the asset directory inside the cache root.
pub const IMAGES_DIR: &str = "images";

/// Persistent mapping from remote resource identifiers to local files.
///
/// Construct one per cache directory and share it by reference (or `Arc`).
/// All index mutation goes through an internal async mutex.
#[derive(Debug)]
pub struct AssetCache {
    pub(crate) root: PathBuf,
    pub(crate) images_dir: PathBuf,
    pub(crate) index_path: PathBuf,
    pub(crate) max_name_len: usize,
    pub(crate) converter: Option<Arc<dyn FormatConverter>>,
    pub(crate) index: Mutex<CacheIndex>,
}

impl AssetCache {
    /// Open the cache at `root` with the default index filename.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, Error> {
        Self::open_with(root, DEFAULT_INDEX_FILE).await
    }

    /// Open the cache at `root`, reading the index from `root/index_file`.
    ///
    /// Creates `root` and `root/images` if needed. A missing index is an empty
    /// cache; an unreadable one is [`Error::CorruptIndex`].
    pub async fn open_with(root: impl AsRef<Path>, index_file: &str) -> Result<Self, Error> {
        let root = std::path::absolute(root.as_ref())
            .map_err(|e| Error::io(format!("resolving {}", root.as_ref().display()), e))?;
        let images_dir = root.join(IMAGES_DIR);

        tokio::fs::create_dir_all(&images_dir)
            .await
            .map_err(|e| Error::io(format!("creating {}", images_dir.display()), e))?;

        let index_path = root.join(index_file);
        let index = CacheIndex::load(&index_path).await?;

        tracing::debug!(path = %index_path.display(), entries = index.len(), "opened asset cache");

        Ok(Self {
            root,
            images_dir,
            index_path,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            converter: Some(Arc::new(JpegNormalizer::default())),
            index: Mutex::new(index),
        })
    }

    /// Open the cache described by an [`AppConfig`].
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let cache = Self::open_with(&config.cache_dir, &config.index_file)
            .await?
            .with_max_name_len(config.max_name_len);

        Ok(if config.normalize_formats { cache } else { cache.without_conversion() })
    }

    /// Replace the format converter.
    pub fn with_converter(mut self, converter: impl FormatConverter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Store every asset exactly as fetched.
    pub fn without_conversion(mut self) -> Self {
        self.converter = None;
        self
    }

    /// Bound derived filenames to `max_name_len` characters.
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Absolute path of an asset file in the image directory.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.images_dir.join(filename)
    }

    /// Filename recorded for `id`, without checking the file exists.
    pub async fn filename(&self, id: &str) -> Option<String> {
        self.index.lock().await.get(id).map(str::to_string)
    }

    pub async fn len(&self) -> usize {
        self.index.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.lock().await.is_empty()
    }

    /// Copy of the current mapping.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.index.lock().await.as_map().clone()
    }
}
