//! Error types for embedding and the full encode/decode pipeline.

use thiserror::Error;
use ultramodem_crypto::AuthError;
use ultramodem_modem::DemodError;
use ultramodem_proto::FrameError;

/// Raised while embedding a command into host PCM: either the framed
/// payload is too large to carry, or the host buffer is shorter than the
/// modem signal and the caller rejected silent extension.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedError {
    /// The host PCM buffer is shorter than the modem signal that must be
    /// carried, and the caller asked to be told rather than have it
    /// silently extended.
    #[error("host buffer has {available} samples, but the modem signal needs {needed}")]
    HostTooShort {
        /// Samples the modem signal requires.
        needed: usize,
        /// Samples actually present in the host buffer.
        available: usize,
    },

    /// The obfuscated ciphertext blob is too large to frame.
    #[error("cannot frame command: {0}")]
    PayloadTooLarge(#[from] FrameError),
}

/// Raised by [`crate::decode_command`] (or [`crate::decode`]) when the
/// full inverse pipeline — extract, demodulate, deframe, decrypt, decode
/// UTF-8 — fails at any stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bandpass-filtered buffer never crossed the detection
    /// threshold: there is no ultrasonic signal here at all.
    #[error("no ultrasonic signal detected")]
    NoSignal,

    /// A signal was present, but no preamble correlation peak locked.
    #[error("no preamble found")]
    NoPreamble,

    /// A preamble locked but the recovered bit stream did not deframe.
    #[error("deframe failed")]
    DeframeFailed,

    /// The frame deframed, but the AEAD tag did not authenticate — wrong
    /// key, corrupted ciphertext, or a tampered buffer.
    #[error("decryption failed: {0}")]
    AuthError(#[from] AuthError),

    /// The decrypted plaintext was not valid UTF-8.
    #[error("decrypted payload is not valid UTF-8")]
    BadUtf8,

    /// The caller's cancellation predicate returned `true` before
    /// decoding finished.
    #[error("decode cancelled")]
    Cancelled,
}

impl From<DemodError> for DecodeError {
    fn from(err: DemodError) -> Self {
        match err {
            DemodError::BelowThreshold => Self::NoSignal,
            DemodError::NoPreamble => Self::NoPreamble,
            DemodError::DeframeFailed(_) => Self::DeframeFailed,
        }
    }
}
