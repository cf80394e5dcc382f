//! Per-screen controllers.
//!
//! Each view owns exactly one [`LiveQuery`] over the session user's collection and
//! turns user intents (save, delete, toggle, unlock) into store writes. Views never
//! patch their own list after a write; the next snapshot does that.

pub mod finance;
pub mod notes;
pub mod tasks;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::auth::Session;
use crate::error::{FlowError, Result};
use crate::model::Record;
use crate::query::{LiveQuery, QueryState};
use crate::store::{CollectionPath, DocumentStore};

pub use finance::FinanceView;
pub use notes::{NotePreview, NotesView, UnlockedNotes};
pub use tasks::TasksView;

/// Shared plumbing for a list screen over records of kind `R`.
pub struct CollectionView<R: Record> {
    store: Arc<dyn DocumentStore>,
    session: Session,
    query: LiveQuery<R>,
}

impl<R: Record> CollectionView<R> {
    /// Mount the live query and apply the first snapshot.
    pub fn mount(store: Arc<dyn DocumentStore>, session: Session) -> Result<Self> {
        let mut query = LiveQuery::new(store.clone(), &session);
        query.mount()?;
        Ok(Self {
            store,
            session,
            query,
        })
    }

    /// Apply snapshots delivered since the last call.
    pub fn refresh(&mut self) -> usize {
        self.query.pump()
    }

    pub fn items(&self) -> &[R] {
        self.query.records()
    }

    /// Look up a record in the current snapshot.
    pub fn find(&self, id: &str) -> Result<&R> {
        self.query
            .get(id)
            .ok_or_else(|| FlowError::NotFound(format!("{} {}", R::ENTITY, id)))
    }

    pub fn state(&self) -> QueryState {
        self.query.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn path(&self) -> CollectionPath {
        self.session.path(R::COLLECTION)
    }

    pub fn unmount(&mut self) {
        self.query.unmount();
    }

    /// Create a record under a freshly reserved id, or overwrite `editing`.
    ///
    /// `build` receives the id so it can be embedded in the document.
    pub(crate) fn save_with<F>(&self, editing: Option<&str>, build: F) -> Result<String>
    where
        F: FnOnce(String) -> Result<R>,
    {
        let path = self.path();
        let (id, is_new) = match editing {
            Some(id) => (id.to_string(), false),
            None => (self.store.new_id(&path), true),
        };
        let record = build(id.clone())?;
        let document = record.to_document()?;

        let written = if is_new {
            self.store.create(&path, &id, document)
        } else {
            self.store.set(&path, &id, document)
        };
        written.map_err(|err| self.write_failed("save", err))?;

        tracing::debug!(path = %path, id = %id, created = is_new, "{} saved", R::ENTITY);
        Ok(id)
    }

    pub(crate) fn update_fields(&self, id: &str, fields: Map<String, Value>) -> Result<()> {
        self.store
            .update(&self.path(), id, fields)
            .map_err(|err| self.write_failed("update", err))
    }

    /// Delete a record by id.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.store
            .delete(&self.path(), id)
            .map_err(|err| self.write_failed("delete", err))?;
        tracing::debug!(path = %self.path(), id = %id, "{} deleted", R::ENTITY);
        Ok(())
    }

    fn write_failed(&self, action: &'static str, err: crate::store::StoreError) -> FlowError {
        tracing::error!(path = %self.path(), error = %err, "failed to {} {}", action, R::ENTITY);
        FlowError::write(action, R::ENTITY, err)
    }
}
