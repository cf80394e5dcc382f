//! Core data types for the document store.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, TryRecvError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Per-user collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Tasks,
    Transactions,
    Notes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Transactions => "transactions",
            Collection::Notes => "notes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        match s {
            "tasks" => Ok(Collection::Tasks),
            "transactions" => Ok(Collection::Transactions),
            "notes" => Ok(Collection::Notes),
            other => Err(StoreError::new(
                StoreErrorKind::InvalidArgument,
                format!("Unknown collection: {}", other),
            )),
        }
    }
}

/// Address of one user's collection: `users/{userId}/{collection}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionPath {
    user_id: String,
    collection: Collection,
}

impl CollectionPath {
    pub fn new(user_id: impl Into<String>, collection: Collection) -> Self {
        Self {
            user_id: user_id.into(),
            collection,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Parse the `users/{userId}/{collection}` form.
    pub fn parse(path: &str) -> StoreResult<Self> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["users", user_id, collection] if !user_id.is_empty() => {
                Ok(Self::new(*user_id, collection.parse()?))
            }
            _ => Err(StoreError::new(
                StoreErrorKind::InvalidArgument,
                format!("Invalid collection path: {}", path),
            )),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "users/{}/{}", self.user_id, self.collection)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Server-side ordering on one document field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A collection query, optionally ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub path: CollectionPath,
    pub order_by: Option<OrderBy>,
}

impl Query {
    /// Unordered query over the whole collection.
    pub fn collection(path: CollectionPath) -> Self {
        Self {
            path,
            order_by: None,
        }
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy::new(field, direction));
        self
    }

    pub fn is_ordered(&self) -> bool {
        self.order_by.is_some()
    }
}

/// An ordered-query index: collection plus field, written `tasks.priority`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexSpec {
    pub collection: Collection,
    pub field: String,
}

impl IndexSpec {
    pub fn new(collection: Collection, field: impl Into<String>) -> Self {
        Self {
            collection,
            field: field.into(),
        }
    }
}

impl FromStr for IndexSpec {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let (collection, field) = s.split_once('.').ok_or_else(|| {
            StoreError::new(
                StoreErrorKind::InvalidArgument,
                format!("Invalid index '{}': expected <collection>.<field>", s),
            )
        })?;
        if field.trim().is_empty() {
            return Err(StoreError::new(
                StoreErrorKind::InvalidArgument,
                format!("Invalid index '{}': field is empty", s),
            ));
        }
        Ok(Self::new(collection.trim().parse()?, field.trim()))
    }
}

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Full materialization of a collection at one point in time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// What a subscriber receives: a snapshot, or the error that ended the listener.
pub type SnapshotEvent = StoreResult<Snapshot>;

/// Identifier of an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiving end of a live query.
///
/// Dropping it stops delivery; the store prunes the listener on its next send.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    events: Receiver<SnapshotEvent>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, events: Receiver<SnapshotEvent>) -> Self {
        Self { id, events }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next pending event, if one has been delivered.
    pub fn try_next(&self) -> Option<SnapshotEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Classifiable store failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Query needs an index that does not exist
    FailedPrecondition,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unavailable,
    Internal,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreErrorKind::FailedPrecondition => "failed-precondition",
            StoreErrorKind::PermissionDenied => "permission-denied",
            StoreErrorKind::NotFound => "not-found",
            StoreErrorKind::AlreadyExists => "already-exists",
            StoreErrorKind::InvalidArgument => "invalid-argument",
            StoreErrorKind::Unavailable => "unavailable",
            StoreErrorKind::Internal => "internal",
        }
    }
}

/// Store error with a classifiable kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} ({})", .kind.as_str())]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Missing index or permission denied: an ordered query may still be served
    /// unordered.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::FailedPrecondition | StoreErrorKind::PermissionDenied
        )
    }
}

/// Total order over JSON field values used for server-side sorting.
///
/// Missing and null sort first, then booleans, numbers, strings, arrays, objects.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(Ordering::Equal),
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_path_display_and_parse() {
        let path = CollectionPath::new("u1", Collection::Notes);
        assert_eq!(path.to_string(), "users/u1/notes");
        assert_eq!(CollectionPath::parse("users/u1/notes").unwrap(), path);
        assert!(CollectionPath::parse("users//notes").is_err());
        assert!(CollectionPath::parse("users/u1/photos").is_err());
    }

    #[test]
    fn test_index_spec_parse() {
        let spec: IndexSpec = "tasks.priority".parse().unwrap();
        assert_eq!(spec, IndexSpec::new(Collection::Tasks, "priority"));
        assert!("tasks".parse::<IndexSpec>().is_err());
        assert!("tasks.".parse::<IndexSpec>().is_err());
    }

    #[test]
    fn test_fallback_classification() {
        assert!(StoreError::new(StoreErrorKind::FailedPrecondition, "idx").triggers_fallback());
        assert!(StoreError::new(StoreErrorKind::PermissionDenied, "no").triggers_fallback());
        assert!(!StoreError::new(StoreErrorKind::Unavailable, "down").triggers_fallback());
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::new(StoreErrorKind::FailedPrecondition, "The query requires an index");
        assert_eq!(
            err.to_string(),
            "The query requires an index (failed-precondition)"
        );
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(
            compare_values(Some(&json!(1)), Some(&json!(3))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.5)), Some(&json!(2))),
            Ordering::Greater
        );
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
        assert_eq!(
            compare_values(Some(&json!("b")), Some(&json!("a"))),
            Ordering::Greater
        );
    }
}
