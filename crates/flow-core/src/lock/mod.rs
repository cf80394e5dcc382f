//! Per-note passphrase locks.
//!
//! A locked note stores its content XOR-ed against the passphrase and wrapped in
//! base64, next to a check value used to validate a re-entered passphrase before
//! attempting to decode.
//!
//! ## Threat Model
//!
//! This is obfuscation, not encryption. It keeps note content from being read at a
//! glance in the store console. We do NOT defend against:
//! - Anyone holding the stored document (the check value is the passphrase, base64-encoded)
//! - Known-plaintext recovery of the passphrase from content

pub mod codec;
pub mod passphrase;

pub use codec::{check_value, decode, encode, verify_passphrase, DecodeError, LockError};
pub use passphrase::Passphrase;
