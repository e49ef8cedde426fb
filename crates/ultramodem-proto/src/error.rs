//! Error types for frame construction and parsing.

use thiserror::Error;

/// Errors raised by [`crate::frame`] or [`crate::deframe`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// `frame()` was asked to encode a payload larger than the 16-bit
    /// length field can represent.
    #[error("payload too large: {len} bytes exceeds the 65535-byte frame limit")]
    PayloadTooLarge {
        /// Length of the rejected payload, in bytes.
        len: usize,
    },

    /// `deframe()` could not find the preamble pattern within its bounded
    /// search window.
    #[error("no preamble found in bit stream")]
    NoPreamble,

    /// The majority-voted length field was implausible: either it exceeds
    /// the protocol maximum, or there are not enough remaining bits to hold
    /// a payload of that length.
    #[error("implausible frame length: {claimed} bytes, {available} coded bits remain")]
    BadLength {
        /// Length decoded from the frame (after majority vote).
        claimed: u16,
        /// Coded payload bits remaining after the length field.
        available: usize,
    },

    /// The bit stream ended before a complete, majority-voted payload could
    /// be read.
    #[error("frame truncated: needed {needed} bits, had {available}")]
    Truncated {
        /// Bits required to complete the frame.
        needed: usize,
        /// Bits actually available.
        available: usize,
    },
}
