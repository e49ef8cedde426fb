//! AEAD encryption and decryption of command payloads.
//!
//! All functions that need randomness take it as an explicit parameter (a
//! fresh IV for `encrypt`) or draw it from the process CSPRNG via `rand`;
//! either way the cryptographic core itself performs no I/O and holds no
//! state beyond the key.

use chacha20poly1305::{
    AeadCore, ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, OsRng},
};
use tracing::instrument;

use crate::{error::AuthError, key::CipherKey};

/// Size of the IV (ChaCha20-Poly1305 standard nonce) in bytes.
pub const IV_SIZE: usize = 12;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// `IV(12) || CIPHERTEXT || TAG(16)`, as described in spec §3.
///
/// The inner bytes are already in wire order; [`CiphertextBlob::as_bytes`]
/// and [`CiphertextBlob::into_bytes`] hand them out directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextBlob(Vec<u8>);

impl CiphertextBlob {
    /// Borrow the wire-format bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the wire-format bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Wrap raw wire-format bytes without validating them.
    ///
    /// Validation (minimum length) happens at [`Cipher::decrypt`] time;
    /// this constructor exists so callers that received bytes over the
    /// wire can represent them as a `CiphertextBlob` before attempting to
    /// decrypt.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Authenticated encryption of command bytes.
///
/// Constructed once from a [`CipherKey`]; thereafter stateless across
/// calls. Never persists or logs the key.
#[derive(Clone)]
pub struct Cipher {
    key: CipherKey,
}

impl Cipher {
    /// Builds a cipher from an already-validated 32-byte key.
    #[must_use]
    pub fn new(key: CipherKey) -> Self {
        Self { key }
    }

    fn aead(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(self.key.as_bytes().into())
    }

    /// Encrypts `plaintext`, generating a fresh random IV.
    ///
    /// Fails only under conditions this crate cannot recover from (out of
    /// memory), which surfaces as a process abort rather than a `Result`,
    /// matching spec §4.1's "fails only on out-of-memory."
    #[instrument(skip(self, plaintext), fields(plaintext_len = plaintext.len()))]
    #[must_use]
    pub fn encrypt(&self, plaintext: &[u8]) -> CiphertextBlob {
        let iv = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        self.encrypt_with_iv(plaintext, &iv)
    }

    /// Encrypts `plaintext` under an explicitly supplied IV.
    ///
    /// Exposed separately from [`Cipher::encrypt`] so tests can exercise
    /// the framing logic deterministically; production callers should use
    /// [`Cipher::encrypt`], which draws a fresh IV from the OS CSPRNG on
    /// every call.
    ///
    /// # Panics
    ///
    /// Never panics for a 12-byte IV; `ChaCha20Poly1305::encrypt` cannot
    /// fail given a key and nonce of the correct, statically-enforced
    /// sizes.
    #[must_use]
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &[u8; IV_SIZE]) -> CiphertextBlob {
        let nonce = Nonce::from_slice(iv);
        let Ok(ciphertext_and_tag) = self.aead().encrypt(nonce, plaintext) else {
            unreachable!("ChaCha20-Poly1305 encryption cannot fail with valid key/nonce sizes");
        };

        let mut wire = Vec::with_capacity(IV_SIZE + ciphertext_and_tag.len());
        wire.extend_from_slice(iv);
        wire.extend_from_slice(&ciphertext_and_tag);
        CiphertextBlob(wire)
    }

    /// Decrypts a [`CiphertextBlob`], verifying the authentication tag.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Malformed`] if `blob` is shorter than `IV + TAG`.
    /// - [`AuthError::TagMismatch`] if the tag does not verify (tampering,
    ///   or the wrong key). Never returns partial or garbage plaintext on
    ///   failure.
    #[instrument(skip(self, blob), fields(blob_len = blob.as_bytes().len()))]
    pub fn decrypt(&self, blob: &CiphertextBlob) -> Result<Vec<u8>, AuthError> {
        let bytes = blob.as_bytes();
        let min = IV_SIZE + TAG_SIZE;
        if bytes.len() < min {
            return Err(AuthError::Malformed { min, actual: bytes.len() });
        }

        let (iv, ciphertext_and_tag) = bytes.split_at(IV_SIZE);
        let nonce = Nonce::from_slice(iv);

        self.aead().decrypt(nonce, ciphertext_and_tag).map_err(|_| AuthError::TagMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> Cipher {
        Cipher::new(CipherKey::new(&[0x11u8; 32]).unwrap())
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();
        let plaintext = b"execute:status_check";

        let blob = cipher.encrypt(plaintext);
        let decrypted = cipher.decrypt(&blob).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn blob_layout_is_iv_ct_tag() {
        let cipher = test_cipher();
        let plaintext = b"hello";
        let blob = cipher.encrypt(plaintext);

        assert_eq!(blob.as_bytes().len(), IV_SIZE + plaintext.len() + TAG_SIZE);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let cipher = test_cipher();
        let blob = cipher.encrypt(b"");
        assert_eq!(cipher.decrypt(&blob).unwrap(), b"");
    }

    #[test]
    fn distinct_calls_use_distinct_ivs() {
        let cipher = test_cipher();
        let a = cipher.encrypt(b"same plaintext");
        let b = cipher.encrypt(b"same plaintext");

        assert_ne!(a.as_bytes()[..IV_SIZE], b.as_bytes()[..IV_SIZE]);
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_byte_fails_decryption() {
        let cipher = test_cipher();
        let mut blob = cipher.encrypt(b"original command").into_bytes();
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;

        let err = cipher.decrypt(&CiphertextBlob::from_bytes(blob)).unwrap_err();
        assert_eq!(err, AuthError::TagMismatch);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let cipher = test_cipher();
        let blob = cipher.encrypt(b"secret");

        let other = Cipher::new(CipherKey::new(&[0x22u8; 32]).unwrap());
        let err = other.decrypt(&blob).unwrap_err();
        assert_eq!(err, AuthError::TagMismatch);
    }

    #[test]
    fn truncated_blob_is_malformed_not_tag_mismatch() {
        let cipher = test_cipher();
        let short = CiphertextBlob::from_bytes(vec![0u8; 10]);

        let err = cipher.decrypt(&short).unwrap_err();
        assert_eq!(err, AuthError::Malformed { min: IV_SIZE + TAG_SIZE, actual: 10 });
    }

    #[test]
    fn blob_exactly_at_minimum_length_is_checked_for_tag() {
        let cipher = test_cipher();
        // 28 bytes: structurally long enough, but garbage, so the tag check
        // (not the length check) must be what rejects it.
        let blob = CiphertextBlob::from_bytes(vec![0u8; IV_SIZE + TAG_SIZE]);
        let err = cipher.decrypt(&blob).unwrap_err();
        assert_eq!(err, AuthError::TagMismatch);
    }

    #[test]
    fn large_payload_roundtrips() {
        let cipher = test_cipher();
        let plaintext = vec![b'a'; 4096];
        let blob = cipher.encrypt(&plaintext);
        assert_eq!(cipher.decrypt(&blob).unwrap(), plaintext);
    }
}
