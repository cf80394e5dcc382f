//! Document store abstraction and backends.
//!
//! Records live one document per record under `users/{userId}/{collection}`.
//! Subscribers receive full snapshots (never diffs) over a channel whenever the
//! collection they watch changes.

pub mod file;
pub mod memory;
pub mod traits;
pub mod types;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::DocumentStore;
pub use types::{
    Collection, CollectionPath, Direction, Document, IndexSpec, OrderBy, Query, Snapshot,
    SnapshotEvent, StoreError, StoreErrorKind, StoreResult, Subscription, SubscriptionId,
};
