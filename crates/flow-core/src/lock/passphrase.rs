//! Passphrase handling for locked notes.

use std::fmt;

use zeroize::Zeroizing;

use super::codec::LockError;

/// A non-empty note passphrase.
///
/// The backing string is zeroized from memory when dropped.
#[derive(Clone)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    /// Accept any non-empty passphrase.
    ///
    /// # Examples
    ///
    /// ```
    /// use flow_core::lock::Passphrase;
    ///
    /// assert!(Passphrase::new("sesame").is_ok());
    /// assert!(Passphrase::new("").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, LockError> {
        let value = Zeroizing::new(value.into());
        if value.is_empty() {
            return Err(LockError::EmptyPassphrase);
        }
        Ok(Self(value))
    }

    /// Borrow the passphrase text.
    ///
    /// Avoid storing or logging this value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Passphrase").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_passphrase_rejected() {
        assert!(matches!(
            Passphrase::new(""),
            Err(LockError::EmptyPassphrase)
        ));
    }

    #[test]
    fn test_whitespace_passphrase_allowed() {
        // Only emptiness is rejected; a single space is still a key byte.
        assert_eq!(Passphrase::new(" ").unwrap().expose(), " ");
    }

    #[test]
    fn test_debug_redacts() {
        let passphrase = Passphrase::new("hunter2").unwrap();
        let debug = format!("{:?}", passphrase);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }
}
