//! Thread-safe compute-if-absent cache for extracted facts
//!
//! Entries are keyed by file path and content hash, so a changed file never
//! hits a stale entry. The cache lives for one run and is passed explicitly
//! to whoever needs it.

use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identity of a cached fact: where it came from and what the bytes were
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub content_hash: String,
}

impl CacheKey {
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        Self {
            path: path.into(),
            content_hash: compute_hash(bytes),
        }
    }

    /// Read the file and key it; the bytes are returned so callers read once
    pub fn from_path(path: &Path) -> std::io::Result<(Self, Vec<u8>)> {
        let bytes = std::fs::read(path)?;
        Ok((Self::from_bytes(path, &bytes), bytes))
    }
}

fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Facts of type `V`, shared between worker threads
pub struct FactCache<V> {
    entries: RwLock<HashMap<CacheKey, Arc<V>>>,
}

impl<V> Default for FactCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> FactCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.entries.read().get(key).cloned()
    }

    /// Return the cached value or compute and store it.
    ///
    /// `compute` runs without any lock held. If two threads race on the same
    /// key both compute, and the first insert wins.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_compute(key, || Ok::<_, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`FactCache::get_or_compute`], but failures are returned and not cached
    pub fn get_or_try_compute<F, E>(&self, key: CacheKey, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = Arc::new(compute()?);
        let mut entries = self.entries.write();
        Ok(entries.entry(key).or_insert(value).clone())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> std::fmt::Debug for FactCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactCache")
            .field("entries", &self.len())
            .finish()
    }
}
