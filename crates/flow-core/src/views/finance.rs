//! Finance screen.

use std::sync::Arc;

use super::CollectionView;
use crate::auth::Session;
use crate::error::Result;
use crate::model::{Summary, Transaction, TransactionDraft};
use crate::query::QueryState;
use crate::store::DocumentStore;

/// Transactions, newest first, with income and expense totals.
pub struct FinanceView {
    inner: CollectionView<Transaction>,
}

impl FinanceView {
    pub fn mount(store: Arc<dyn DocumentStore>, session: Session) -> Result<Self> {
        Ok(Self {
            inner: CollectionView::mount(store, session)?,
        })
    }

    pub fn refresh(&mut self) -> usize {
        self.inner.refresh()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.inner.items()
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self.inner.items())
    }

    pub fn find(&self, id: &str) -> Result<&Transaction> {
        self.inner.find(id)
    }

    pub fn state(&self) -> QueryState {
        self.inner.state()
    }

    pub fn save(&self, draft: TransactionDraft, editing: Option<&str>) -> Result<String> {
        let user_id = self.inner.session().user_id().to_string();
        self.inner
            .save_with(editing, |id| draft.into_transaction(id, user_id))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id)
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }
}
