//! Authenticated encryption and payload obfuscation for `ultramodem`.
//!
//! This crate implements component C1 of the ultramodem pipeline: it turns a
//! command string's UTF-8 bytes into a self-describing, tamper-evident
//! ciphertext blob, and optionally wraps that blob in a structural
//! obfuscation header/trailer before it is handed to the framer.
//!
//! # Pipeline position
//!
//! ```text
//! command bytes -> Cipher::encrypt -> CiphertextBlob -> [Cipher::obfuscate] -> Payload
//! ```
//!
//! # Security
//!
//! - AEAD: standard (96-bit nonce) `ChaCha20-Poly1305`. A fresh random IV is
//!   drawn from the OS CSPRNG on every [`Cipher::encrypt`] call.
//! - Any single-bit flip anywhere in a [`CiphertextBlob`] causes
//!   [`Cipher::decrypt`] to fail with [`AuthError::TagMismatch`]; no partial
//!   plaintext is ever returned on failure.
//! - Keys are owned by the [`Cipher`] instance that holds them and are
//!   zeroized on drop ([`CipherKey`]). This crate never persists keys.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod error;
mod key;
mod obfuscate;

pub use cipher::{Cipher, CiphertextBlob, IV_SIZE, TAG_SIZE};
pub use error::{AuthError, ConfigError};
pub use key::CipherKey;
pub use obfuscate::{MAGIC as OBFUSCATION_MAGIC, deobfuscate, obfuscate};

impl Cipher {
    /// Wraps a [`CiphertextBlob`] with a random structural header/trailer.
    ///
    /// See [`obfuscate`] for the wire format.
    #[must_use]
    pub fn obfuscate_blob(&self, blob: &CiphertextBlob, rng: &mut impl rand::RngCore) -> Vec<u8> {
        obfuscate(blob.as_bytes(), rng)
    }

    /// Removes an obfuscation wrapper, if present.
    ///
    /// See [`deobfuscate`] for the tolerant matching behavior.
    #[must_use]
    pub fn deobfuscate_blob(&self, bytes: &[u8]) -> Vec<u8> {
        deobfuscate(bytes)
    }
}
