//! Document store trait definition.
//!
//! The `DocumentStore` trait is the contract Flow expects from its backing
//! real-time database. Views depend only on this trait, so a hosted service, the
//! JSON file store, or the in-memory store can sit behind them.

use serde_json::{Map, Value};

use super::types::{CollectionPath, Query, StoreResult, Subscription, SubscriptionId};

/// Real-time document store interface.
///
/// All implementations must ensure:
/// - Every write to a collection is followed by a full snapshot to each of its subscribers
/// - Snapshots for one subscription are delivered in order
/// - Errors on a subscription are delivered as its final event
/// - `unsubscribe` is idempotent
pub trait DocumentStore: Send + Sync {
    /// Reserve a fresh document id in `path`.
    ///
    /// The id is stable: callers embed it in the document before the first write.
    fn new_id(&self, path: &CollectionPath) -> String;

    /// Create a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::AlreadyExists` if `id` is taken.
    fn create(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()>;

    /// Create or fully overwrite a document.
    fn set(&self, path: &CollectionPath, id: &str, data: Value) -> StoreResult<()>;

    /// Merge `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::NotFound` if the document does not exist.
    fn update(&self, path: &CollectionPath, id: &str, fields: Map<String, Value>)
        -> StoreResult<()>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()>;

    /// Start a live query.
    ///
    /// The current snapshot is queued immediately. Failures that the backend only
    /// discovers while serving the query (a missing index, a rules rejection) arrive
    /// as an `Err` event on the subscription rather than from this call.
    fn subscribe(&self, query: &Query) -> StoreResult<Subscription>;

    /// Stop a live query. Unknown or already-stopped ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
