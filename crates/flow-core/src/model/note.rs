//! Notes, optionally locked behind a passphrase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::{FlowError, Result};
use crate::lock::{check_value, encode, Passphrase};
use crate::store::{Collection, Direction};

/// A note. When `locked`, `content` holds lock codec output and `password_hash`
/// holds the passphrase check value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,

    #[serde(default)]
    pub user_id: String,

    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub locked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
}

impl Record for Note {
    const COLLECTION: Collection = Collection::Notes;
    const ENTITY: &'static str = "note";
    const SORT_FIELD: &'static str = "lastModified";
    const SORT_DIRECTION: Direction = Direction::Descending;

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> i64 {
        self.last_modified.timestamp_millis()
    }
}

/// Editor state for a note.
///
/// `content` is always plaintext here; sealing turns it into what gets stored.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub locked: bool,
    /// Passphrase typed into the form; used for sealing when `locked`
    pub passphrase: Option<Passphrase>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Lock with `passphrase` on save.
    pub fn locked_with(mut self, passphrase: Passphrase) -> Self {
        self.locked = true;
        self.passphrase = Some(passphrase);
        self
    }

    /// Store as plaintext on save.
    pub fn unlocked(mut self) -> Self {
        self.locked = false;
        self.passphrase = None;
        self
    }

    /// Build the stored note.
    ///
    /// A locked draft is encoded with the passphrase currently in the form, which
    /// may differ from the one the note was unlocked with.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Validation` if the title is empty or a locked draft has
    /// no passphrase.
    pub fn seal(self, id: String, user_id: String, now: DateTime<Utc>) -> Result<Note> {
        if self.title.trim().is_empty() {
            return Err(FlowError::Validation("Note title is required".to_string()));
        }

        let (content, password_hash) = if self.locked {
            let passphrase = self.passphrase.as_ref().ok_or_else(|| {
                FlowError::Validation("A locked note needs a password".to_string())
            })?;
            (
                encode(&self.content, passphrase),
                Some(check_value(passphrase.expose())),
            )
        } else {
            (self.content, None)
        };

        Ok(Note {
            id,
            user_id,
            title: self.title,
            content,
            locked: self.locked,
            password_hash,
            last_modified: now,
        })
    }
}
