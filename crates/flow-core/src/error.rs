//! Error types for Flow core operations.
//!
//! Errors are descriptive at the core level; the view layer maps them to
//! user-facing messages via [`FlowError::user_message`].

use thiserror::Error;

use crate::lock::{DecodeError, LockError};
use crate::store::{StoreError, StoreErrorKind};

/// Result type alias for Flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Core error type for Flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Lock codec misuse (for example an empty passphrase)
    #[error("Lock error: {0}")]
    Lock(#[from] LockError),

    /// A locked note could not be opened
    #[error("Unlock failed: {0}")]
    Unlock(#[from] UnlockError),

    /// Document store error outside of a user write
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A user-initiated write (save, update, delete) was rejected by the store
    #[error("Failed to {action} {entity}. Please try again.")]
    Write {
        action: &'static str,
        entity: &'static str,
        #[source]
        source: StoreError,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Why a locked note stayed locked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnlockError {
    /// No passphrase given, or it does not match the stored check value
    #[error("Incorrect password!")]
    IncorrectPassphrase,

    /// The check value matched but the stored content would not decode
    #[error("Failed to decrypt note. Incorrect password or corrupted data.")]
    Corrupted(#[source] DecodeError),
}

impl FlowError {
    /// Wrap a store error raised by a user write.
    pub fn write(action: &'static str, entity: &'static str, source: StoreError) -> Self {
        FlowError::Write {
            action,
            entity,
            source,
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Unlock and write failures already read as user messages; everything else
    /// is reported with its full description.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Unlock(err) => err.to_string(),
            FlowError::Write { .. } => self.to_string(),
            FlowError::Validation(msg) | FlowError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure came from the store refusing access.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            FlowError::Store(err) | FlowError::Write { source: err, .. } => {
                err.kind() == StoreErrorKind::PermissionDenied
            }
            _ => false,
        }
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::Store(StoreError::new(StoreErrorKind::Unavailable, err.to_string()))
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_message() {
        let err = FlowError::write(
            "save",
            "note",
            StoreError::new(StoreErrorKind::Unavailable, "offline"),
        );
        assert_eq!(err.user_message(), "Failed to save note. Please try again.");
    }

    #[test]
    fn test_unlock_message() {
        let err = FlowError::from(UnlockError::IncorrectPassphrase);
        assert_eq!(err.user_message(), "Incorrect password!");
    }

    #[test]
    fn test_permission_denied_detection() {
        let err = FlowError::write(
            "delete",
            "task",
            StoreError::new(StoreErrorKind::PermissionDenied, "nope"),
        );
        assert!(err.is_permission_denied());
        assert!(!FlowError::NotFound("x".into()).is_permission_denied());
    }
}
