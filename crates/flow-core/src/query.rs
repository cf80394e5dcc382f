//! Live queries with ordered-to-fallback degradation.
//!
//! A [`LiveQuery`] keeps a local list in step with one user collection. It first
//! asks the store for a server-ordered subscription. If the store reports a missing
//! index or a permission rejection, it cancels that subscription and resubscribes
//! without ordering, sorting each snapshot locally instead. The switch happens at
//! most once per mount and is invisible to the user.
//!
//! ```text
//! Unsubscribed --mount--> OrderedSubscribed --index/permission error--> FallbackSubscribed
//!       \                        |                                              |
//!        \-------unmount---------+---------------------unmount------------------+--> TornDown
//! ```

use std::sync::Arc;

use crate::auth::Session;
use crate::error::{FlowError, Result};
use crate::model::{ordered_query, sort_records, Record};
use crate::store::{CollectionPath, DocumentStore, Query, Snapshot, StoreError, Subscription};

/// Lifecycle of a live query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Not yet mounted.
    Unsubscribed,
    /// Store sorts; snapshots are taken verbatim.
    OrderedSubscribed,
    /// Store returns unordered snapshots; they are sorted locally.
    FallbackSubscribed,
    /// Unmounted. Terminal.
    TornDown,
}

impl QueryState {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            QueryState::OrderedSubscribed | QueryState::FallbackSubscribed
        )
    }
}

/// A live, user-scoped, ordered view of one collection.
///
/// Every delivered snapshot replaces the local list wholesale. Writes made
/// elsewhere (including by this view) show up only once the store delivers the
/// next snapshot and [`LiveQuery::pump`] runs.
pub struct LiveQuery<R: Record> {
    store: Arc<dyn DocumentStore>,
    path: CollectionPath,
    state: QueryState,
    subscription: Option<Subscription>,
    records: Vec<R>,
    last_error: Option<StoreError>,
}

impl<R: Record> LiveQuery<R> {
    /// Prepare a query over the session user's collection for `R`.
    pub fn new(store: Arc<dyn DocumentStore>, session: &Session) -> Self {
        Self {
            store,
            path: session.path(R::COLLECTION),
            state: QueryState::Unsubscribed,
            subscription: None,
            records: Vec::new(),
            last_error: None,
        }
    }

    /// Subscribe (ordered) and apply whatever the store has already delivered.
    ///
    /// Mounting an active query is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidInput` after [`LiveQuery::unmount`], and
    /// `FlowError::Store` when the store rejects the subscription outright for a
    /// reason other than a missing index or permissions.
    pub fn mount(&mut self) -> Result<()> {
        match self.state {
            QueryState::Unsubscribed => {}
            QueryState::TornDown => {
                return Err(FlowError::InvalidInput(format!(
                    "Live query on {} was already unmounted",
                    self.path
                )))
            }
            QueryState::OrderedSubscribed | QueryState::FallbackSubscribed => return Ok(()),
        }

        let query = ordered_query::<R>(self.path.user_id());
        self.state = QueryState::OrderedSubscribed;
        match self.store.subscribe(&query) {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(err) if err.triggers_fallback() => self.fall_back(err),
            Err(err) => {
                tracing::warn!(path = %self.path, error = %err, "subscription rejected");
                self.state = QueryState::Unsubscribed;
                return Err(err.into());
            }
        }

        self.pump();
        Ok(())
    }

    /// Handle every event delivered so far, in order. Returns the number of
    /// snapshots applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_ref().and_then(Subscription::try_next) {
            match event {
                Ok(snapshot) => {
                    self.apply(snapshot);
                    applied += 1;
                }
                Err(err) => self.handle_error(err),
            }
        }
        applied
    }

    /// Cancel the active subscription. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription.id());
            tracing::debug!(path = %self.path, subscription = %subscription.id(), "unsubscribed");
        }
        self.state = QueryState::TornDown;
    }

    /// Records from the last applied snapshot, in natural order.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Last subscription error that did not trigger the fallback.
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    fn apply(&mut self, snapshot: Snapshot) {
        let mut records = Vec::with_capacity(snapshot.len());
        for document in &snapshot.documents {
            match R::from_document(document) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path,
                        id = %document.id,
                        error = %err,
                        "skipping malformed document"
                    );
                }
            }
        }

        if self.state == QueryState::FallbackSubscribed {
            sort_records(&mut records);
        }
        tracing::debug!(
            path = %self.path,
            count = records.len(),
            fallback = self.state == QueryState::FallbackSubscribed,
            "{} snapshot loaded",
            R::ENTITY
        );
        self.records = records;
    }

    fn handle_error(&mut self, err: StoreError) {
        if self.state == QueryState::OrderedSubscribed && err.triggers_fallback() {
            self.fall_back(err);
        } else {
            // Keep the last good records on screen.
            tracing::warn!(path = %self.path, error = %err, "live query failed");
            self.last_error = Some(err);
        }
    }

    fn fall_back(&mut self, cause: StoreError) {
        tracing::info!(
            path = %self.path,
            cause = %cause,
            "ordered query unavailable, falling back to client-side sort"
        );
        if let Some(subscription) = self.subscription.take() {
            self.store.unsubscribe(subscription.id());
        }
        self.state = QueryState::FallbackSubscribed;

        match self.store.subscribe(&Query::collection(self.path.clone())) {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(err) => {
                tracing::warn!(path = %self.path, error = %err, "fallback query failed");
                self.last_error = Some(err);
            }
        }
    }
}

impl<R: Record> Drop for LiveQuery<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::User;
    use crate::model::Note;
    use crate::store::{MemoryStore, StoreErrorKind};
    use serde_json::json;

    fn session() -> Session {
        Session::new(User::new("u1", "u1@example.com"))
    }

    #[test]
    fn test_mount_enters_ordered_state() {
        let store = Arc::new(MemoryStore::new());
        let mut query: LiveQuery<Note> = LiveQuery::new(store.clone(), &session());
        assert_eq!(query.state(), QueryState::Unsubscribed);

        query.mount().unwrap();
        assert_eq!(query.state(), QueryState::OrderedSubscribed);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_mount_twice_keeps_one_subscription() {
        let store = Arc::new(MemoryStore::new());
        let mut query: LiveQuery<Note> = LiveQuery::new(store.clone(), &session());
        query.mount().unwrap();
        query.mount().unwrap();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_remount_after_unmount_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut query: LiveQuery<Note> = LiveQuery::new(store, &session());
        query.mount().unwrap();
        query.unmount();
        assert!(matches!(query.mount(), Err(FlowError::InvalidInput(_))));
    }

    #[test]
    fn test_non_fallback_error_keeps_stale_records() {
        let store = Arc::new(MemoryStore::new());
        let path = session().path(crate::store::Collection::Notes);
        store
            .set(&path, "n1", json!({"title": "a", "lastModified": 1}))
            .unwrap();

        let mut query: LiveQuery<Note> = LiveQuery::new(store.clone(), &session());
        query.mount().unwrap();
        assert_eq!(query.records().len(), 1);

        store.fail_subscribers(&path, StoreError::new(StoreErrorKind::Unavailable, "down"));
        query.pump();

        assert_eq!(query.state(), QueryState::OrderedSubscribed);
        assert_eq!(query.records().len(), 1);
        assert_eq!(
            query.last_error().map(StoreError::kind),
            Some(StoreErrorKind::Unavailable)
        );
    }

    #[test]
    fn test_malformed_documents_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let path = session().path(crate::store::Collection::Notes);
        store
            .set(&path, "good", json!({"title": "a", "lastModified": 1}))
            .unwrap();
        store.set(&path, "bad", json!({"lastModified": "yesterday"})).unwrap();

        let mut query: LiveQuery<Note> = LiveQuery::new(store, &session());
        query.mount().unwrap();
        let ids: Vec<&str> = query.records().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
    }
}
