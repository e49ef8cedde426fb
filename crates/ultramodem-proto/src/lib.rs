//! Frame layout for `ultramodem`: component C2 of the pipeline.
//!
//! This crate owns the deterministic mapping between a `Payload`'s raw
//! bytes and the bit sequence that the modulator turns into ultrasonic
//! tones — preamble, triple-repeated length field, triple-repeated
//! payload, and random tail padding. It is codec-agnostic: everything here
//! operates on `bool`-per-bit sequences, never on PCM samples, so this
//! crate has no dependency on the modem's sample rate or frequencies.
//!
//! # Pipeline position
//!
//! ```text
//! Payload bytes -> frame() -> bit sequence -> (modulator) -> ... -> (demodulator) -> bit sequence -> deframe() -> Payload bytes
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod bits;
mod constants;
mod error;
mod framer;

pub use constants::{
    LENGTH_FIELD_LEN, MAX_PAYLOAD_LEN, MAX_PREAMBLE_SEARCH_BITS, PREAMBLE, PREAMBLE_LEN,
    REPETITION,
};
pub use error::FrameError;
pub use framer::{deframe, frame};
