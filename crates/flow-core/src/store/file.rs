//! JSON file-backed document store.
//!
//! Keeps every collection in memory (a [`MemoryStore`]) and rewrites the whole
//! file atomically on each write. A write only reaches memory and subscribers
//! once the file has been written; if that fails the write is rejected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::memory::{CollectionMap, MemoryStore};
use super::traits::DocumentStore;
use super::types::{
    CollectionPath, IndexSpec, Query, StoreError, StoreErrorKind, StoreResult, Subscription,
    SubscriptionId,
};
use crate::fs::write_atomic;

/// Current on-disk format version.
pub const FORMAT_VERSION: &str = "1";

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    format_version: String,
    #[serde(default)]
    collections: BTreeMap<String, BTreeMap<String, Value>>,
}

/// [`DocumentStore`] persisted to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::Unavailable` if the file cannot be read and
    /// `StoreErrorKind::Internal` if it is not a Flow store.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let collections = if path.exists() {
            load(&path)?
        } else {
            CollectionMap::new()
        };
        tracing::debug!(path = %path.display(), collections = collections.len(), "opened store");
        let target = path.clone();
        let inner = MemoryStore::from_collections(collections).with_commit_hook(Box::new(
            move |collections: &CollectionMap| persist(&target, collections),
        ));
        Ok(Self { path, inner })
    }

    /// Restrict ordered queries to these indexes.
    pub fn with_indexes(self, indexes: impl IntoIterator<Item = IndexSpec>) -> Self {
        Self {
            path: self.path,
            inner: self.inner.with_indexes(indexes),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn persist(path: &Path, collections: &CollectionMap) -> StoreResult<()> {
    let file = StoreFile {
        format_version: FORMAT_VERSION.to_string(),
        collections: collections
            .iter()
            .map(|(path, docs)| (path.to_string(), docs.clone()))
            .collect(),
    };
    let bytes = serde_json::to_vec_pretty(&file)
        .map_err(|e| StoreError::new(StoreErrorKind::Internal, e.to_string()))?;
    write_atomic(path, &bytes).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "store write failed");
        StoreError::new(
            StoreErrorKind::Unavailable,
            format!("Failed to write store {}: {}", path.display(), e),
        )
    })
}

fn load(path: &Path) -> StoreResult<CollectionMap> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        StoreError::new(
            StoreErrorKind::Unavailable,
            format!("Failed to read store {}: {}", path.display(), e),
        )
    })?;
    let file: StoreFile = serde_json::from_str(&contents).map_err(|e| {
        StoreError::new(
            StoreErrorKind::Internal,
            format!("Failed to parse store {}: {}", path.display(), e),
        )
    })?;
    if file.format_version != FORMAT_VERSION {
        return Err(StoreError::new(
            StoreErrorKind::Internal,
            format!(
                "Unsupported store format version {} (expected {})",
                file.format_version, FORMAT_VERSION
            ),
        ));
    }

    let mut collections = CollectionMap::new();
    for (key, docs) in file.collections {
        collections.insert(CollectionPath::parse(&key)?, docs);
    }
    Ok(collections)
}

impl DocumentStore for JsonFileStore {
    fn new_id(&self, path: &CollectionPath) -> String {
        self.inner.new_id(path)
    }

    fn create(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()> {
        self.inner.create(path, id, data)
    }

    fn set(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()> {
        self.inner.set(path, id, data)
    }

    fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        self.inner.update(path, id, fields)
    }

    fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        self.inner.delete(path, id)
    }

    fn subscribe(&self, query: &Query) -> StoreResult<Subscription> {
        self.inner.subscribe(query)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.unsubscribe(id)
    }
}
