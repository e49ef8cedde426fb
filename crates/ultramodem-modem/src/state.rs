//! Pure state-machine data types for the demodulation pipeline.
//!
//! Modeled on the teacher's `ConnectionState` design: each pipeline stage
//! is described by a plain data enum with no behavior attached, leaving
//! [`crate::Demodulator`] itself as the only place that performs I/O-free
//! computation and decides which state comes next.

use crate::error::DemodError;

/// Where a [`crate::Demodulator::decode`] call landed.
///
/// `Idle` is the state before any buffer has been processed; the other
/// variants describe the outcome of one `decode` call over one PCM
/// buffer, not a persistent cross-call cursor (per spec §5, the
/// demodulator keeps no cross-call state beyond reusable scratch
/// buffers).
#[derive(Debug, Clone, PartialEq)]
pub enum DemodulatorState {
    /// No buffer has been processed yet.
    Idle,
    /// Bandpass filtering is in progress (reported only by
    /// [`crate::Demodulator::decode`]'s internal bookkeeping; never
    /// observed as a call's terminal state).
    Filtering,
    /// Energy gate passed; searching for the preamble correlation peak.
    Searching,
    /// Preamble located at the given sample offset; demodulating symbols.
    Locked {
        /// Sample index, within the filtered buffer, where the preamble
        /// begins.
        preamble_start: usize,
    },
    /// A payload was recovered and authenticated by the frame layer.
    Decoded {
        /// The recovered, still-encrypted-and-obfuscated payload bytes.
        payload: Vec<u8>,
    },
    /// The pipeline terminated early; see [`DemodError`] for which stage
    /// failed.
    Failed(DemodError),
}
