//! Asset lookup, fetch-through and maintenance operations.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use super::convert::FormatConverter;
use super::fetcher::Fetcher;
use super::index::CacheIndex;
use super::naming;
use super::store::AssetCache;
use crate::Error;

/// What happened to the asset's format while it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalization {
    /// Stored as fetched (also reported for cache hits).
    Unchanged,
    /// Converted from the named source extension.
    Converted { from: String },
    /// Conversion failed; the fetched bytes were kept under the target name.
    ///
    /// The asset may not be in the format its name implies.
    Fallback { reason: String },
}

/// A resolved local file for a resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub id: String,
    pub local_name: String,
    pub local_path: PathBuf,
    pub normalization: Normalization,
}

impl AssetReference {
    /// Whether the caller should surface a warning for this asset.
    pub fn is_degraded(&self) -> bool {
        matches!(self.normalization, Normalization::Fallback { .. })
    }
}

impl AssetCache {
    /// Whether `id` is mapped and its file still exists.
    ///
    /// A mapping whose file is gone is evicted and the index persisted.
    pub async fn is_known(&self, id: &str) -> Result<bool, Error> {
        let mut index = self.index.lock().await;
        self.check_known(&mut index, id).await
    }

    /// Return the local file for `id`, fetching it through `fetcher` on a miss.
    ///
    /// The fetcher runs at most once per miss and never while the index is
    /// locked. Its errors are returned unchanged and leave the index untouched.
    pub async fn ensure<F>(&self, id: &str, fetcher: &F) -> Result<AssetReference, Error>
    where
        F: Fetcher + ?Sized,
    {
        if id.is_empty() {
            return Err(Error::InvalidInput("resource identifier must not be empty".to_string()));
        }

        {
            let mut index = self.index.lock().await;
            if let Some(reference) = self.lookup(&mut index, id).await? {
                tracing::debug!(id, filename = %reference.local_name, "asset cache hit");
                return Ok(reference);
            }
        }

        tracing::debug!(id, "asset cache miss");
        let fetched = fetcher.fetch(id).await?;

        let mut index = self.index.lock().await;

        // another task may have stored it while we were fetching
        if let Some(reference) = self.lookup(&mut index, id).await? {
            tracing::debug!(id, filename = %reference.local_name, "asset stored concurrently, dropping fetched bytes");
            return Ok(reference);
        }

        let candidate = naming::candidate_name(
            id,
            fetched.name.as_deref(),
            fetched.extension.as_deref(),
            self.max_name_len,
        );

        let converter = self.converter.as_ref().filter(|c| c.needs_conversion(&candidate)).cloned();
        let target = match &converter {
            Some(c) => naming::with_extension(&candidate, c.target_extension()),
            None => candidate.clone(),
        };
        let target = naming::resolve_collision(target, |name| index.contains_filename(name))?;

        let local_path = self.path_for(&target);
        let normalization = materialize(self.images_dir.clone(), local_path.clone(), fetched.bytes, converter, candidate)
            .await?;

        if let Normalization::Fallback { reason } = &normalization {
            tracing::warn!(id, filename = %target, %reason, "format conversion failed, keeping fetched bytes");
        }

        index.insert(id.to_string(), target.clone());
        if let Err(e) = index.persist(&self.index_path).await {
            index.remove(id);
            return Err(e);
        }

        tracing::info!(id, filename = %target, "cached asset");

        Ok(AssetReference { id: id.to_string(), local_name: target, local_path, normalization })
    }

    /// Drop every entry whose filename matches `predicate`.
    ///
    /// Asset files stay on disk. Returns the number of entries removed.
    pub async fn purge_where<P>(&self, mut predicate: P) -> Result<usize, Error>
    where
        P: FnMut(&str) -> bool,
    {
        let mut index = self.index.lock().await;
        let removed = index.retain(|_, filename| !predicate(filename));
        let removed = self.commit_removal(&mut index, removed).await?;

        tracing::info!(removed, remaining = index.len(), "purged asset entries");
        Ok(removed)
    }

    /// Drop every entry with an empty filename or a missing file.
    ///
    /// Returns the number of entries removed.
    pub async fn repair(&self) -> Result<usize, Error> {
        let mut index = self.index.lock().await;

        let mut stale = Vec::new();
        for (id, filename) in index.iter() {
            if filename.is_empty() || !is_file(&self.path_for(filename)).await {
                tracing::info!(id, filename, "dropping stale asset entry");
                stale.push(id.to_string());
            }
        }

        let removed: Vec<(String, String)> =
            stale.into_iter().filter_map(|id| index.remove(&id).map(|name| (id, name))).collect();
        self.commit_removal(&mut index, removed).await
    }

    async fn lookup(&self, index: &mut CacheIndex, id: &str) -> Result<Option<AssetReference>, Error> {
        if !self.check_known(index, id).await? {
            return Ok(None);
        }

        Ok(index.get(id).map(|name| AssetReference {
            id: id.to_string(),
            local_name: name.to_string(),
            local_path: self.path_for(name),
            normalization: Normalization::Unchanged,
        }))
    }

    async fn check_known(&self, index: &mut CacheIndex, id: &str) -> Result<bool, Error> {
        let Some(filename) = index.get(id).map(str::to_string) else {
            return Ok(false);
        };

        if !filename.is_empty() && is_file(&self.path_for(&filename)).await {
            return Ok(true);
        }

        tracing::info!(id, %filename, "asset file missing, evicting entry");
        index.remove(id);
        self.commit_removal(index, vec![(id.to_string(), filename)]).await?;
        Ok(false)
    }

    /// Persist after entries were taken out of `index`, putting them back if that fails.
    async fn commit_removal(&self, index: &mut CacheIndex, removed: Vec<(String, String)>) -> Result<usize, Error> {
        if removed.is_empty() {
            return Ok(0);
        }

        let count = removed.len();
        if let Err(e) = index.persist(&self.index_path).await {
            index.restore(removed);
            return Err(e);
        }
        Ok(count)
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Write fetched bytes to `target`, converting them first when a converter applies.
async fn materialize(
    images_dir: PathBuf, target: PathBuf, bytes: Bytes, converter: Option<Arc<dyn FormatConverter>>,
    source_name: String,
) -> Result<Normalization, Error> {
    tokio::task::spawn_blocking(move || {
        let context = || format!("writing {}", target.display());

        let mut staged = tempfile::NamedTempFile::new_in(&images_dir).map_err(|e| Error::io(context(), e))?;
        staged.write_all(&bytes).map_err(|e| Error::io(context(), e))?;
        staged.as_file().sync_all().map_err(|e| Error::io(context(), e))?;

        let Some(converter) = converter else {
            staged.persist(&target).map_err(|e| Error::io(context(), e.error))?;
            return Ok(Normalization::Unchanged);
        };

        let converted = tempfile::NamedTempFile::new_in(&images_dir).map_err(|e| Error::io(context(), e))?;
        match converter.convert(staged.path(), converted.path()) {
            Ok(()) => {
                converted.persist(&target).map_err(|e| Error::io(context(), e.error))?;
                let from = naming::extension(&source_name).unwrap_or_default().to_ascii_lowercase();
                Ok(Normalization::Converted { from })
            }
            Err(e) => {
                staged.persist(&target).map_err(|e| Error::io(context(), e.error))?;
                Ok(Normalization::Fallback { reason: e.to_string() })
            }
        }
    })
    .await?
}
