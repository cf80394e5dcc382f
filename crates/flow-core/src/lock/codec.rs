//! XOR + base64 lock codec.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use super::passphrase::Passphrase;

/// Stored ciphertext could not be turned back into text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid base64
    #[error("ciphertext is not valid base64: {0}")]
    Transport(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 (usually a wrong passphrase)
    #[error("decoded content is not valid UTF-8")]
    NotText,
}

/// Lock codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LockError {
    #[error("passphrase cannot be empty")]
    EmptyPassphrase,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Obfuscate `plaintext` under `passphrase`.
///
/// Deterministic: the same inputs always produce the same output.
///
/// # Examples
///
/// ```
/// use flow_core::lock::{decode, encode, Passphrase};
///
/// let key = Passphrase::new("sesame").unwrap();
/// let stored = encode("Meeting notes", &key);
/// assert_eq!(decode(&stored, &key).unwrap(), "Meeting notes");
/// ```
pub fn encode(plaintext: &str, passphrase: &Passphrase) -> String {
    STANDARD.encode(xor_cycle(plaintext.as_bytes(), passphrase.as_bytes()))
}

/// Reverse [`encode`].
///
/// # Errors
///
/// Returns `DecodeError::Transport` for malformed base64 and `DecodeError::NotText`
/// when the XOR output is not UTF-8.
pub fn decode(ciphertext: &str, passphrase: &Passphrase) -> Result<String, DecodeError> {
    let raw = STANDARD.decode(ciphertext)?;
    String::from_utf8(xor_cycle(&raw, passphrase.as_bytes())).map_err(|_| DecodeError::NotText)
}

/// Check value stored beside a locked note: the passphrase bytes, base64-encoded.
pub fn check_value(passphrase: &str) -> String {
    STANDARD.encode(passphrase.as_bytes())
}

/// Whether `candidate` matches a stored check value.
pub fn verify_passphrase(candidate: &str, stored_check: &str) -> bool {
    check_value(candidate) == stored_check
}

// Key repeats cyclically over the data; callers guarantee a non-empty key.
fn xor_cycle(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect()
}
