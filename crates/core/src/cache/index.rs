//! The persisted identifier → filename index.
//!
//! Stored as one JSON object. Every mutation is followed by a full rewrite
//! through a temporary file, so the document on disk is always complete.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::Error;

/// Default filename of the index inside the cache root.
pub const DEFAULT_INDEX_FILE: &str = "cache.json";

/// In-memory mapping from resource identifier to unique local filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheIndex {
    entries: BTreeMap<String, String>,
    filenames: BTreeSet<String>,
}

impl CacheIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from raw entries, checking the filename invariants.
    ///
    /// Empty filenames are tolerated here; they read as stale entries.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Result<Self, String> {
        let mut filenames = BTreeSet::new();
        for (id, name) in &entries {
            if name.is_empty() {
                continue;
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(format!("filename {name:?} for {id:?} is not a plain filename"));
            }
            if !filenames.insert(name.clone()) {
                return Err(format!("filename {name:?} is mapped by more than one identifier"));
            }
        }
        Ok(Self { entries, filenames })
    }

    /// Load the index from `path`.
    ///
    /// A missing file yields an empty index.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(Error::io(format!("reading {}", path.display()), e)),
        };

        let corrupt = |reason: String| Error::CorruptIndex { path: path.to_path_buf(), reason };
        let entries: BTreeMap<String, String> = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;
        Self::from_entries(entries).map_err(corrupt)
    }

    /// Rewrite the whole index at `path`.
    pub async fn persist(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_vec(&self.entries).map_err(|e| Error::io("serializing index", e.into()))?;
        write_atomic(path.to_path_buf(), json).await
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Whether any identifier already maps to `filename`.
    pub fn contains_filename(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Record `id → filename`, returning the previous filename for `id`.
    ///
    /// The caller is responsible for `filename` being free; see
    /// [`naming::resolve_collision`](super::naming::resolve_collision).
    pub fn insert(&mut self, id: String, filename: String) -> Option<String> {
        debug_assert!(!self.filenames.contains(&filename) || self.get(&id) == Some(filename.as_str()));
        let previous = self.entries.insert(id, filename.clone());
        if let Some(old) = &previous {
            self.filenames.remove(old);
        }
        if !filename.is_empty() {
            self.filenames.insert(filename);
        }
        previous
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        let removed = self.entries.remove(id)?;
        self.filenames.remove(&removed);
        Some(removed)
    }

    /// Keep only entries for which `keep(id, filename)` holds; returns the dropped entries.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) -> Vec<(String, String)> {
        let dropped: Vec<String> = self
            .entries
            .iter()
            .filter(|(id, name)| !keep(id.as_str(), name.as_str()))
            .map(|(id, _)| id.clone())
            .collect();

        dropped
            .into_iter()
            .filter_map(|id| self.remove(&id).map(|name| (id, name)))
            .collect()
    }

    /// Put back entries previously taken out with [`remove`](Self::remove) or
    /// [`retain`](Self::retain).
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        for (id, filename) in entries {
            self.insert(id, filename);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

/// Write `bytes` to `path` via a synced temporary file in the same directory.
pub(crate) async fn write_atomic(path: PathBuf, bytes: Vec<u8>) -> Result<(), Error> {
    tokio::task::spawn_blocking(move || {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
        let context = || format!("writing {}", path.display());

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(context(), e))?;
        tmp.write_all(&bytes).map_err(|e| Error::io(context(), e))?;
        tmp.as_file().sync_all().map_err(|e| Error::io(context(), e))?;
        tmp.persist(&path).map_err(|e| Error::io(context(), e.error))?;
        Ok(())
    })
    .await?
}
