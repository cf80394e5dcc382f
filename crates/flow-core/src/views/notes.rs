//! Notes screen and the per-mount unlocked-notes set.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use zeroize::Zeroizing;

use super::CollectionView;
use crate::auth::Session;
use crate::error::{Result, UnlockError};
use crate::lock::{decode, verify_passphrase, Passphrase};
use crate::model::{Note, NoteDraft};
use crate::query::QueryState;
use crate::store::DocumentStore;

/// Notes whose passphrase was entered correctly during this mount.
///
/// Never serialized. Revealed plaintext is tied to the ciphertext it was decoded
/// from, so a snapshot carrying new content for the same id does not leak the old
/// plaintext.
#[derive(Default)]
pub struct UnlockedNotes {
    entries: HashMap<String, Revealed>,
}

struct Revealed {
    ciphertext: String,
    plaintext: Zeroizing<String>,
}

impl UnlockedNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached plaintext for `note`, if it was unlocked and has not changed since.
    pub fn plaintext_for(&self, note: &Note) -> Option<&str> {
        self.entries
            .get(&note.id)
            .filter(|revealed| revealed.ciphertext == note.content)
            .map(|revealed| revealed.plaintext.as_str())
    }

    /// Verify `candidate` against `note` and decode its content.
    ///
    /// The id joins the set only when both the check value matches and decoding
    /// succeeds. A plaintext note decodes to its own content without joining.
    pub fn unlock(
        &mut self,
        note: &Note,
        candidate: Option<&str>,
    ) -> std::result::Result<String, UnlockError> {
        if !note.locked {
            return Ok(note.content.clone());
        }
        if let Some(plaintext) = self.plaintext_for(note) {
            return Ok(plaintext.to_string());
        }

        let candidate = candidate.ok_or(UnlockError::IncorrectPassphrase)?;
        let stored = note.password_hash.as_deref().unwrap_or_default();
        if !verify_passphrase(candidate, stored) {
            return Err(UnlockError::IncorrectPassphrase);
        }
        let passphrase =
            Passphrase::new(candidate).map_err(|_| UnlockError::IncorrectPassphrase)?;
        let plaintext = decode(&note.content, &passphrase).map_err(UnlockError::Corrupted)?;

        self.remember(note, plaintext.clone());
        Ok(plaintext)
    }

    fn remember(&mut self, note: &Note, plaintext: String) {
        self.entries.insert(
            note.id.clone(),
            Revealed {
                ciphertext: note.content.clone(),
                plaintext: Zeroizing::new(plaintext),
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}

/// What the list shows under a note's title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotePreview {
    Text(String),
    Empty,
    Locked,
}

impl NotePreview {
    pub const EMPTY_TEXT: &'static str = "No content";
    pub const LOCKED_TEXT: &'static str = "This note is locked";

    pub fn as_text(&self) -> &str {
        match self {
            NotePreview::Text(text) => text.as_str(),
            NotePreview::Empty => Self::EMPTY_TEXT,
            NotePreview::Locked => Self::LOCKED_TEXT,
        }
    }
}

/// Notes, most recently modified first.
pub struct NotesView {
    inner: CollectionView<Note>,
    unlocked: UnlockedNotes,
}

impl NotesView {
    pub fn mount(store: Arc<dyn DocumentStore>, session: Session) -> Result<Self> {
        Ok(Self {
            inner: CollectionView::mount(store, session)?,
            unlocked: UnlockedNotes::new(),
        })
    }

    pub fn refresh(&mut self) -> usize {
        self.inner.refresh()
    }

    pub fn notes(&self) -> &[Note] {
        self.inner.items()
    }

    pub fn find(&self, id: &str) -> Result<&Note> {
        self.inner.find(id)
    }

    pub fn state(&self) -> QueryState {
        self.inner.state()
    }

    pub fn unlocked(&self) -> &UnlockedNotes {
        &self.unlocked
    }

    /// Plain notes are always readable; locked ones only once unlocked.
    pub fn is_unlocked(&self, note: &Note) -> bool {
        !note.locked || self.unlocked.plaintext_for(note).is_some()
    }

    pub fn needs_passphrase(&self, id: &str) -> Result<bool> {
        let note = self.inner.find(id)?;
        Ok(!self.is_unlocked(note))
    }

    pub fn preview(&self, note: &Note) -> NotePreview {
        let text = if note.locked {
            match self.unlocked.plaintext_for(note) {
                Some(plaintext) => plaintext,
                None => return NotePreview::Locked,
            }
        } else {
            note.content.as_str()
        };
        if text.trim().is_empty() {
            NotePreview::Empty
        } else {
            NotePreview::Text(text.to_string())
        }
    }

    /// Reveal a note's content, unlocking it first if needed.
    pub fn view_note(&mut self, id: &str, passphrase: Option<&str>) -> Result<String> {
        let note = self.inner.find(id)?;
        let content = self.unlocked.unlock(note, passphrase)?;
        Ok(content)
    }

    /// Open the editor for `id`.
    ///
    /// A locked note comes back with `locked` set and no passphrase; the form has
    /// to supply one again before saving.
    pub fn start_edit(&mut self, id: &str, passphrase: Option<&str>) -> Result<NoteDraft> {
        let note = self.inner.find(id)?;
        let content = match self.unlocked.unlock(note, passphrase) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(id = %id, "note stayed locked: {}", err);
                return Err(err.into());
            }
        };
        Ok(NoteDraft {
            title: note.title.clone(),
            content,
            locked: note.locked,
            passphrase: None,
        })
    }

    /// Seal and write a note, stamping `lastModified`.
    ///
    /// An unlocked note saved locked again stays unlocked with its new content; one
    /// saved as plaintext leaves the set.
    pub fn save(&mut self, draft: NoteDraft, editing: Option<&str>) -> Result<String> {
        let user_id = self.inner.session().user_id().to_string();
        let plaintext = Zeroizing::new(draft.content.clone());
        let mut sealed = None;
        let id = self.inner.save_with(editing, |id| {
            let note = draft.seal(id, user_id, Utc::now())?;
            sealed = Some(note.clone());
            Ok(note)
        })?;

        if self.unlocked.contains(&id) {
            match sealed {
                Some(note) if note.locked => self.unlocked.remember(&note, plaintext.to_string()),
                _ => {
                    self.unlocked.remove(&id);
                }
            }
        }
        Ok(id)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.inner.delete(id)?;
        self.unlocked.remove(id);
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
        self.unlocked = UnlockedNotes::new();
    }
}
