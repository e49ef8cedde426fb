//! Frame-layout constants that both ends of a link must agree on bit-for-bit.

/// 16-bit preamble pattern, chosen for its autocorrelation properties (no
/// long runs, so it stands out against typical payload/noise bit patterns).
///
/// Fixed per spec §6 / §9's open question: `1010 1010 1100 1100`.
pub const PREAMBLE: u16 = 0b1010_1010_1100_1100;

/// Number of bits in [`PREAMBLE`].
pub const PREAMBLE_LEN: usize = 16;

/// Number of bits in the big-endian length field, before repetition coding.
pub const LENGTH_FIELD_LEN: usize = 16;

/// Repetition factor applied to every logical bit (length field and payload
/// alike): each bit is transmitted this many times consecutively.
pub const REPETITION: usize = 3;

/// Largest payload `frame()` will encode; the length field is 16 bits.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// How far into the recovered bit stream `deframe()` will search for
/// [`PREAMBLE`] before giving up. The demodulator has already performed
/// sample-level synchronization, so only a small residual bit-level offset
/// is expected here.
pub const MAX_PREAMBLE_SEARCH_BITS: usize = 64;
