//! Error types for the ultramodem cryptographic layer.

use thiserror::Error;

/// Errors that can occur while constructing a [`crate::CipherKey`] or
/// [`crate::Cipher`].
///
/// Fatal at construction; steady-state `encrypt`/`decrypt` calls never
/// return this.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Key material was not exactly 32 bytes.
    #[error("invalid key length: expected 32 bytes, got {actual}")]
    InvalidKeyLength {
        /// Length actually supplied.
        actual: usize,
    },
}

/// Decryption / authentication failure.
///
/// Returned whenever a [`crate::CiphertextBlob`] cannot be trusted: tag
/// mismatch, truncated input, or malformed header. Never carries partial
/// plaintext.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The blob was shorter than `IV(12) || TAG(16)`, so it cannot possibly
    /// contain a valid ciphertext.
    #[error("ciphertext blob too short: expected at least {min} bytes, got {actual}")]
    Malformed {
        /// Minimum valid blob length.
        min: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// AEAD tag verification failed: the blob was tampered with, or the key
    /// used to decrypt it does not match the key used to encrypt it.
    #[error("authentication tag mismatch")]
    TagMismatch,
}
