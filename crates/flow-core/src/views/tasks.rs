//! Tasks screen.

use std::sync::Arc;

use serde_json::{json, Map};

use super::CollectionView;
use crate::auth::Session;
use crate::error::Result;
use crate::model::{filter_by_list, list_names, Task, TaskDraft, ALL_LISTS};
use crate::query::QueryState;
use crate::store::DocumentStore;

/// Tasks ordered High to Low priority, with an optional list filter.
pub struct TasksView {
    inner: CollectionView<Task>,
    filter: String,
}

impl TasksView {
    pub fn mount(store: Arc<dyn DocumentStore>, session: Session) -> Result<Self> {
        Ok(Self {
            inner: CollectionView::mount(store, session)?,
            filter: ALL_LISTS.to_string(),
        })
    }

    pub fn refresh(&mut self) -> usize {
        self.inner.refresh()
    }

    /// Every task in the last snapshot.
    pub fn tasks(&self) -> &[Task] {
        self.inner.items()
    }

    /// Tasks in the selected list.
    pub fn visible(&self) -> Vec<&Task> {
        filter_by_list(self.inner.items(), &self.filter)
    }

    /// `"All"` plus every list name seen.
    pub fn lists(&self) -> Vec<String> {
        list_names(self.inner.items())
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, list: impl Into<String>) {
        self.filter = list.into();
    }

    pub fn find(&self, id: &str) -> Result<&Task> {
        self.inner.find(id)
    }

    pub fn state(&self) -> QueryState {
        self.inner.state()
    }

    /// Create a task, or overwrite `editing` keeping its completion state.
    pub fn save(&self, draft: TaskDraft, editing: Option<&str>) -> Result<String> {
        let is_completed = match editing {
            Some(id) => self.inner.find(id)?.is_completed,
            None => false,
        };
        let user_id = self.inner.session().user_id().to_string();
        self.inner
            .save_with(editing, |id| draft.into_task(id, user_id, is_completed))
    }

    /// Flip `isCompleted` on one task.
    pub fn toggle_complete(&self, id: &str) -> Result<bool> {
        let completed = !self.inner.find(id)?.is_completed;
        let mut fields = Map::new();
        fields.insert("isCompleted".to_string(), json!(completed));
        self.inner.update_fields(id, fields)?;
        Ok(completed)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id)
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }
}
