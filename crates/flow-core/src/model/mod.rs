//! Record types stored per user.
//!
//! Each record kind maps to one collection and has a natural ordering key used
//! both for the server-side order and for the local fallback sort.

pub mod note;
pub mod task;
pub mod transaction;

use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::store::{Collection, CollectionPath, Direction, Document, Query};

pub use note::{Note, NoteDraft};
pub use task::{filter_by_list, list_names, Priority, Task, TaskDraft, ALL_LISTS, DEFAULT_LIST};
pub use transaction::{Summary, Transaction, TransactionDraft};

/// A record kind stored one document per record in a user collection.
pub trait Record: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + 'static {
    /// Collection holding this kind.
    const COLLECTION: Collection;

    /// Singular noun used in user messages ("task", "note").
    const ENTITY: &'static str;

    /// Document field of the natural ordering key.
    const SORT_FIELD: &'static str;

    /// Display direction of the natural ordering key.
    const SORT_DIRECTION: Direction;

    fn id(&self) -> &str;

    /// Value of `SORT_FIELD` as an integer (timestamps in milliseconds).
    fn sort_key(&self) -> i64;

    /// Decode a stored document. The document id wins over any `id` field in the body.
    fn from_document(document: &Document) -> Result<Self> {
        let mut data = document.data.clone();
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(document.id.clone()));
        }
        Ok(serde_json::from_value(data)?)
    }

    /// Encode for a full-document write.
    fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The server-ordered query for `R` in one user's collection.
pub fn ordered_query<R: Record>(user_id: &str) -> Query {
    Query::collection(CollectionPath::new(user_id, R::COLLECTION))
        .order_by(R::SORT_FIELD, R::SORT_DIRECTION)
}

/// Compare two records by natural order, ties broken by ascending id.
pub fn compare_records<R: Record>(a: &R, b: &R) -> Ordering {
    let ordering = a.sort_key().cmp(&b.sort_key());
    let ordering = match R::SORT_DIRECTION {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    };
    ordering.then_with(|| a.id().cmp(b.id()))
}

/// Sort records locally exactly as an ordered query would.
pub fn sort_records<R: Record>(records: &mut [R]) {
    records.sort_by(compare_records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, millis: i64) -> Note {
        Note {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: id.to_string(),
            content: String::new(),
            locked: false,
            password_hash: None,
            last_modified: Utc.timestamp_millis_opt(millis).unwrap(),
        }
    }

    #[test]
    fn test_sort_descending_with_id_tiebreak() {
        let mut notes = vec![note("b", 10), note("c", 30), note("a", 10)];
        sort_records(&mut notes);
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ordered_query_uses_natural_key() {
        let query = ordered_query::<Task>("u1");
        let order = query.order_by.unwrap();
        assert_eq!(order.field, "priority");
        assert_eq!(order.direction, Direction::Ascending);
        assert_eq!(query.path.to_string(), "users/u1/tasks");
    }

    #[test]
    fn test_document_id_overrides_body() {
        let document = Document {
            id: "real".to_string(),
            data: serde_json::json!({
                "id": "stale",
                "title": "n",
                "content": "",
                "locked": false,
                "lastModified": 5
            }),
        };
        let decoded = Note::from_document(&document).unwrap();
        assert_eq!(decoded.id, "real");
    }
}
