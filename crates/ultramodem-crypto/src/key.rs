//! Cipher key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ConfigError;

/// A 256-bit AEAD key, owned by a single [`crate::Cipher`] instance.
///
/// The key is zeroized on drop. Cloning a `CipherKey` clones the key
/// material itself; callers that clone a `Cipher` inherit this same
/// zeroize-on-drop guarantee for each copy.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; 32]);

impl CipherKey {
    /// Builds a key from exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyLength`] if `bytes` is not 32 bytes
    /// long.
    pub fn new(bytes: &[u8]) -> Result<Self, ConfigError> {
        let actual = bytes.len();
        let array: [u8; 32] =
            bytes.try_into().map_err(|_| ConfigError::InvalidKeyLength { actual })?;
        Ok(Self(array))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Redact key material from `Debug` output.
impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CipherKey").field(&"<redacted>").finish()
    }
}

impl PartialEq for CipherKey {
    fn eq(&self, other: &Self) -> bool {
        // Not constant-time: key *equality* is only ever compared in tests,
        // never on attacker-controlled input.
        self.0 == other.0
    }
}

impl Eq for CipherKey {}
