//! Error types for modem configuration and demodulation.

use thiserror::Error;
use ultramodem_proto::FrameError;

/// Invalid [`crate::ModemConfig`] at construction.
///
/// Fatal at construction; steady-state modulate/demodulate calls never
/// return this.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A tone frequency is at or above the Nyquist frequency for the
    /// configured sample rate.
    #[error("frequency {freq} Hz is at or above the Nyquist frequency ({nyquist} Hz)")]
    FrequencyAboveNyquist {
        /// The offending frequency, in Hz.
        freq: f64,
        /// Half the configured sample rate, in Hz.
        nyquist: f64,
    },

    /// `freq_0` and `freq_1` are too close together to discriminate
    /// reliably.
    #[error("tone separation {separation} Hz is below the required minimum ({min} Hz)")]
    FrequencySeparationTooSmall {
        /// `|freq_1 - freq_0|`, in Hz.
        separation: f64,
        /// Minimum required separation, in Hz.
        min: f64,
    },

    /// `bit_duration` is too short relative to the tone frequencies: fewer
    /// than 4 full cycles of the lower tone would fit in one symbol.
    #[error(
        "bit_duration {bit_duration}s allows only {cycles} cycles of the lowest tone \
         (need at least {min_cycles})"
    )]
    BitDurationTooShort {
        /// Configured bit duration, in seconds.
        bit_duration: f64,
        /// Cycles of `min(freq_0, freq_1)` that fit in `bit_duration`.
        cycles: f64,
        /// Minimum required cycle count.
        min_cycles: f64,
    },

    /// `amplitude` is outside `(0, 1]`.
    #[error("amplitude {amplitude} is outside the valid range (0, 1]")]
    InvalidAmplitude {
        /// The offending amplitude.
        amplitude: f32,
    },

    /// `detection_threshold` is not strictly positive.
    #[error("detection_threshold {threshold} must be greater than 0")]
    InvalidDetectionThreshold {
        /// The offending threshold.
        threshold: f32,
    },
}

/// Errors raised while demodulating a PCM buffer.
///
/// Mirrors spec §4.4's `Failed` sub-states: signal too weak to bother
/// searching, preamble not found, or a located frame that failed to
/// deframe (majority-voted length implausible, or the bit stream ran out).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DemodError {
    /// Peak RMS of the bandpass-filtered signal never crossed
    /// `detection_threshold`.
    #[error("signal below detection threshold")]
    BelowThreshold,

    /// No preamble correlation peak crossed the lock threshold.
    #[error("no preamble found")]
    NoPreamble,

    /// A preamble was located and bits were demodulated, but the framer
    /// could not recover a coherent payload from them.
    #[error("deframe failed: {0}")]
    DeframeFailed(#[from] FrameError),
}
