//! Binary FSK modulation and demodulation for ultramodem.
//!
//! This crate covers C3 (Modulator) and C4 (Demodulator): turning a bit
//! stream into a continuous-phase BFSK PCM waveform and back, plus the
//! [`ModemConfig`] both ends of a link must agree on. It depends on
//! [`ultramodem_proto`] because the demodulator's terminal pipeline stage
//! calls `deframe` directly rather than stopping at a bare bit vector.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod demodulator;
mod error;
mod filter;
mod goertzel;
mod modulator;
mod state;

pub use config::{
    ModemConfig, DEFAULT_AMPLITUDE, DEFAULT_BIT_DURATION, DEFAULT_DETECTION_THRESHOLD,
    DEFAULT_FREQ_0, DEFAULT_FREQ_1, DEFAULT_SAMPLE_RATE,
};
pub use demodulator::Demodulator;
pub use error::{ConfigError, DemodError};
pub use filter::BandpassFilter;
pub use goertzel::goertzel_magnitude;
pub use modulator::modulate;
pub use state::DemodulatorState;
