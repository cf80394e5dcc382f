//! # Flow Core
//!
//! Core library for Flow - a personal task, finance, and notes manager backed by a
//! real-time document store.
//!
//! This crate provides the domain logic, storage abstractions, and data models
//! independent of any rendering layer.
//!
//! ## Architecture
//!
//! - **lock**: Per-note passphrase lock codec and check values
//! - **model**: Task, transaction, and note records
//! - **store**: Document store trait, snapshots, in-memory and JSON file backends
//! - **query**: Live queries with ordered-to-fallback degradation
//! - **auth**: Authentication provider trait, sessions, local accounts
//! - **views**: Per-screen controllers (tasks, finance, notes)

pub mod auth;
pub mod error;
pub mod fs;
pub mod lock;
pub mod model;
pub mod query;
pub mod store;
pub mod views;

pub use auth::{AuthProvider, LocalAuth, Session, User};
pub use error::{FlowError, Result, UnlockError};
pub use query::{LiveQuery, QueryState};
pub use store::{DocumentStore, JsonFileStore, MemoryStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
