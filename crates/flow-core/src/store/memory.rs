//! In-process document store.
//!
//! Serves live queries over `std::sync::mpsc` channels. Ordered queries can be
//! restricted to a declared set of indexes, and subscription or write failures can
//! be injected, which is how the fallback path is exercised without a hosted backend.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};
use uuid::Uuid;

use super::traits::DocumentStore;
use super::types::{
    compare_values, CollectionPath, Direction, Document, IndexSpec, Query, Snapshot,
    SnapshotEvent, StoreError, StoreErrorKind, StoreResult, Subscription, SubscriptionId,
};

/// Documents grouped by collection path, then by document id.
pub type CollectionMap = BTreeMap<CollectionPath, BTreeMap<String, Value>>;

/// Runs against the would-be contents before a write is committed. An error
/// aborts the write: nothing changes and no snapshot goes out.
pub type CommitHook = Box<dyn Fn(&CollectionMap) -> StoreResult<()> + Send + Sync>;

/// In-memory [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    on_commit: Option<CommitHook>,
}

#[derive(Default)]
struct Inner {
    collections: CollectionMap,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription: u64,
    /// `None` serves every ordered query.
    indexes: Option<BTreeSet<IndexSpec>>,
    subscribe_failures: VecDeque<StoreError>,
    write_failures: VecDeque<StoreError>,
}

struct Subscriber {
    query: Query,
    sender: Sender<SnapshotEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing documents.
    pub fn from_collections(collections: CollectionMap) -> Self {
        Self {
            inner: Mutex::new(Inner {
                collections,
                ..Inner::default()
            }),
            on_commit: None,
        }
    }

    /// Check every write with `hook` before it becomes visible.
    pub fn with_commit_hook(mut self, hook: CommitHook) -> Self {
        self.on_commit = Some(hook);
        self
    }

    /// Serve ordered queries only for these indexes; other ordered queries fail
    /// with `failed-precondition`.
    pub fn with_indexes(self, indexes: impl IntoIterator<Item = IndexSpec>) -> Self {
        self.lock().indexes = Some(indexes.into_iter().collect());
        self
    }

    /// Make the next `subscribe` call end its subscription with `error`.
    pub fn fail_next_subscription(&self, error: StoreError) {
        self.lock().subscribe_failures.push_back(error);
    }

    /// Make the next write (create, set, update, delete) fail with `error`.
    pub fn fail_next_write(&self, error: StoreError) {
        self.lock().write_failures.push_back(error);
    }

    /// End every live subscription on `path` with `error`, as a backend does when
    /// a listener breaks mid-stream. Those subscribers are dropped afterwards.
    pub fn fail_subscribers(&self, path: &CollectionPath, error: StoreError) {
        let mut inner = self.lock();
        let failed: Vec<SubscriptionId> = inner
            .subscribers
            .iter()
            .filter(|(_, subscriber)| &subscriber.query.path == path)
            .map(|(id, _)| *id)
            .collect();
        for id in failed {
            if let Some(subscriber) = inner.subscribers.remove(&id) {
                let _ = subscriber.sender.send(Err(error.clone()));
            }
        }
    }

    /// Copy of every stored document.
    pub fn collections(&self) -> CollectionMap {
        self.lock().collections.clone()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write<F>(&self, path: &CollectionPath, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, Value>) -> StoreResult<()>,
    {
        validate_path(path)?;
        let mut inner = self.lock();
        if let Some(err) = inner.write_failures.pop_front() {
            return Err(err);
        }
        let mut docs = inner.collections.get(path).cloned().unwrap_or_default();
        apply(&mut docs)?;

        let previous = if docs.is_empty() {
            inner.collections.remove(path)
        } else {
            inner.collections.insert(path.clone(), docs)
        };
        if let Some(hook) = &self.on_commit {
            if let Err(err) = hook(&inner.collections) {
                match previous {
                    Some(docs) => inner.collections.insert(path.clone(), docs),
                    None => inner.collections.remove(path),
                };
                return Err(err);
            }
        }
        inner.broadcast(path);
        Ok(())
    }
}

impl Inner {
    fn snapshot(&self, query: &Query) -> Snapshot {
        let mut documents: Vec<Document> = self
            .collections
            .get(&query.path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // Documents start in id order; the stable sort keeps ties that way.
        if let Some(order) = &query.order_by {
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.data.get(&order.field), b.data.get(&order.field));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        Snapshot { documents }
    }

    fn serves(&self, query: &Query) -> bool {
        match (&query.order_by, &self.indexes) {
            (Some(order), Some(indexes)) => {
                indexes.contains(&IndexSpec::new(query.path.collection(), &order.field))
            }
            _ => true,
        }
    }

    fn broadcast(&mut self, path: &CollectionPath) {
        let mut closed = Vec::new();
        for (id, subscriber) in &self.subscribers {
            if &subscriber.query.path != path {
                continue;
            }
            let snapshot = self.snapshot(&subscriber.query);
            if subscriber.sender.send(Ok(snapshot)).is_err() {
                closed.push(*id);
            }
        }
        for id in closed {
            self.subscribers.remove(&id);
        }
    }
}

impl DocumentStore for MemoryStore {
    fn new_id(&self, _path: &CollectionPath) -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn create(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()> {
        let data = object(data)?;
        self.write(path, |docs| {
            if docs.contains_key(id) {
                return Err(StoreError::new(
                    StoreErrorKind::AlreadyExists,
                    format!("Document already exists: {}/{}", path, id),
                ));
            }
            docs.insert(id.to_string(), data);
            Ok(())
        })
    }

    fn set(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()> {
        let data = object(data)?;
        self.write(path, |docs| {
            docs.insert(id.to_string(), data);
            Ok(())
        })
    }

    fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        self.write(path, |docs| {
            let doc = docs.get_mut(id).ok_or_else(|| {
                StoreError::new(
                    StoreErrorKind::NotFound,
                    format!("No document to update: {}/{}", path, id),
                )
            })?;
            if let Value::Object(existing) = doc {
                existing.extend(fields);
            }
            Ok(())
        })
    }

    fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        self.write(path, |docs| {
            docs.remove(id);
            Ok(())
        })
    }

    fn subscribe(&self, query: &Query) -> StoreResult<Subscription> {
        validate_path(&query.path)?;
        let mut inner = self.lock();
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        let (sender, receiver) = mpsc::channel();

        let failure = match inner.subscribe_failures.pop_front() {
            Some(err) => Some(err),
            None if !inner.serves(query) => Some(StoreError::new(
                StoreErrorKind::FailedPrecondition,
                format!(
                    "The query requires an index on {}.{}",
                    query.path.collection(),
                    query.order_by.as_ref().map(|o| o.field.as_str()).unwrap_or("")
                ),
            )),
            None => None,
        };

        match failure {
            // A failed listener is dead after its error; it is never registered.
            Some(err) => {
                let _ = sender.send(Err(err));
            }
            None => {
                let _ = sender.send(Ok(inner.snapshot(query)));
                inner.subscribers.insert(
                    id,
                    Subscriber {
                        query: query.clone(),
                        sender,
                    },
                );
            }
        }

        Ok(Subscription::new(id, receiver))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.remove(&id);
    }
}

fn validate_path(path: &CollectionPath) -> StoreResult<()> {
    if path.user_id().trim().is_empty() {
        return Err(StoreError::new(
            StoreErrorKind::InvalidArgument,
            "Collection path has an empty user id",
        ));
    }
    Ok(())
}

fn object(data: Value) -> StoreResult<Value> {
    match data {
        Value::Object(_) => Ok(data),
        other => Err(StoreError::new(
            StoreErrorKind::InvalidArgument,
            format!("Documents must be JSON objects, got {}", other),
        )),
    }
}
