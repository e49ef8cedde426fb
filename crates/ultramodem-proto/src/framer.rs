//! Deterministic mapping between payload bytes and the transmitted bit
//! sequence: preamble, triple-repeated length field, triple-repeated
//! payload, and random tail padding.

use rand::RngCore;
use tracing::instrument;

use crate::{
    bits::{
        bits_to_bytes_msb, bits_to_u16_msb, majority_vote_groups, push_byte_msb, push_repeated,
        push_u16_msb,
    },
    constants::{
        LENGTH_FIELD_LEN, MAX_PAYLOAD_LEN, MAX_PREAMBLE_SEARCH_BITS, PREAMBLE, PREAMBLE_LEN,
        REPETITION,
    },
    error::FrameError,
};

fn preamble_bits() -> Vec<bool> {
    let mut bits = Vec::with_capacity(PREAMBLE_LEN);
    push_u16_msb(&mut bits, PREAMBLE);
    bits
}

/// Encodes `payload` into the transmitted bit sequence.
///
/// `min_total_bits` is the smallest frame length the caller needs (derived
/// from the modem's configured minimum signal duration); [`frame`] pads with
/// random bits until the frame reaches at least that length. Because every
/// bit here corresponds to exactly one modulated symbol, "round up to the
/// next whole symbol" (spec §4.2 step 5) is automatically satisfied once the
/// minimum-duration bit count is reached — there is no fractional symbol to
/// round away.
///
/// # Errors
///
/// Returns [`FrameError::PayloadTooLarge`] if `payload.len() > 65535` (the
/// 16-bit length field cannot represent it).
#[instrument(skip(payload, rng), fields(payload_len = payload.len()))]
pub fn frame(
    payload: &[u8],
    min_total_bits: usize,
    rng: &mut impl RngCore,
) -> Result<Vec<bool>, FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLarge { len: payload.len() });
    }

    let mut bits = preamble_bits();

    let mut length_bits = Vec::with_capacity(LENGTH_FIELD_LEN);
    #[allow(clippy::cast_possible_truncation)] // bounded by MAX_PAYLOAD_LEN == u16::MAX above
    push_u16_msb(&mut length_bits, payload.len() as u16);
    push_repeated(&mut bits, &length_bits, REPETITION);

    let mut payload_bits = Vec::with_capacity(payload.len() * 8);
    for &byte in payload {
        push_byte_msb(&mut payload_bits, byte);
    }
    push_repeated(&mut bits, &payload_bits, REPETITION);

    while bits.len() < min_total_bits {
        bits.push(rng.next_u32() & 1 == 1);
    }

    Ok(bits)
}

/// Recovers the original payload from a (possibly bit-offset) recovered bit
/// sequence.
///
/// # Errors
///
/// - [`FrameError::NoPreamble`] if the preamble cannot be located within the
///   bounded search window.
/// - [`FrameError::BadLength`] if the majority-voted length field is larger
///   than the remaining coded bits could possibly encode.
/// - [`FrameError::Truncated`] if the bit stream ends before a complete
///   length field or payload can be read.
#[instrument(skip(bits), fields(bit_count = bits.len()))]
pub fn deframe(bits: &[bool]) -> Result<Vec<u8>, FrameError> {
    let preamble = preamble_bits();
    let preamble_start = find_preamble(bits, &preamble).ok_or(FrameError::NoPreamble)?;

    let length_coded_start = preamble_start + PREAMBLE_LEN;
    let length_coded_len = LENGTH_FIELD_LEN * REPETITION;
    if bits.len() < length_coded_start + length_coded_len {
        return Err(FrameError::Truncated {
            needed: length_coded_start + length_coded_len,
            available: bits.len(),
        });
    }

    let length_coded = &bits[length_coded_start..length_coded_start + length_coded_len];
    let Some(length_bits) = majority_vote_groups(length_coded, REPETITION) else {
        unreachable!("length_coded_len is exactly LENGTH_FIELD_LEN * REPETITION");
    };
    let length = bits_to_u16_msb(&length_bits);

    let payload_coded_start = length_coded_start + length_coded_len;
    let available_after_length = bits.len() - payload_coded_start;
    let max_plausible_length = available_after_length / (8 * REPETITION);

    if length as usize > max_plausible_length {
        return Err(FrameError::BadLength { claimed: length, available: available_after_length });
    }

    let payload_coded_len = length as usize * 8 * REPETITION;
    if available_after_length < payload_coded_len {
        return Err(FrameError::Truncated {
            needed: payload_coded_start + payload_coded_len,
            available: bits.len(),
        });
    }

    let payload_coded = &bits[payload_coded_start..payload_coded_start + payload_coded_len];
    let Some(payload_bits) = majority_vote_groups(payload_coded, REPETITION) else {
        unreachable!("payload_coded_len is exactly length * 8 * REPETITION");
    };
    let Some(payload) = bits_to_bytes_msb(&payload_bits) else {
        unreachable!("payload_bits.len() is exactly length * 8");
    };

    Ok(payload)
}

/// Finds the earliest exact match of `preamble` in `bits`, searching only
/// the first [`MAX_PREAMBLE_SEARCH_BITS`] candidate offsets.
fn find_preamble(bits: &[bool], preamble: &[bool]) -> Option<usize> {
    if bits.len() < preamble.len() {
        return None;
    }
    let last_start = (bits.len() - preamble.len()).min(MAX_PREAMBLE_SEARCH_BITS);
    (0..=last_start).find(|&start| bits[start..start + preamble.len()] == *preamble)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn frame_then_deframe_roundtrips() {
        let payload = b"execute:status_check";
        let bits = frame(payload, 0, &mut rng()).unwrap();
        let recovered = deframe(&bits).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn empty_payload_roundtrips() {
        let bits = frame(b"", 0, &mut rng()).unwrap();
        assert_eq!(deframe(&bits).unwrap(), b"");
    }

    #[test]
    fn frame_respects_minimum_total_bits() {
        let bits = frame(b"hi", 1000, &mut rng()).unwrap();
        assert!(bits.len() >= 1000);
    }

    #[test]
    fn frame_without_minimum_has_no_padding() {
        let payload = b"ab";
        let bits = frame(payload, 0, &mut rng()).unwrap();
        let expected_len = PREAMBLE_LEN + LENGTH_FIELD_LEN * REPETITION + payload.len() * 8 * REPETITION;
        assert_eq!(bits.len(), expected_len);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = vec![0u8; 65536];
        let err = frame(&payload, 0, &mut rng()).unwrap_err();
        assert_eq!(err, FrameError::PayloadTooLarge { len: 65536 });
    }

    #[test]
    fn deframe_rejects_all_zero_stream() {
        let bits = vec![false; 200];
        let err = deframe(&bits).unwrap_err();
        assert_eq!(err, FrameError::NoPreamble);
    }

    #[test]
    fn single_length_bit_flip_still_recovers_via_majority_vote() {
        let payload = b"tolerant";
        let mut bits = frame(payload, 0, &mut rng()).unwrap();

        // Flip one of the three repeated copies of the length field's
        // top bit (first bit right after the preamble).
        let flip_index = PREAMBLE_LEN;
        bits[flip_index] = !bits[flip_index];

        assert_eq!(deframe(&bits).unwrap(), payload);
    }

    #[test]
    fn single_payload_bit_flip_still_recovers_via_majority_vote() {
        let payload = b"x";
        let mut bits = frame(payload, 0, &mut rng()).unwrap();

        let payload_coded_start = PREAMBLE_LEN + LENGTH_FIELD_LEN * REPETITION;
        bits[payload_coded_start] = !bits[payload_coded_start];

        assert_eq!(deframe(&bits).unwrap(), payload);
    }

    #[test]
    fn truncated_stream_after_preamble_is_reported() {
        let bits = preamble_bits();
        let err = deframe(&bits).unwrap_err();
        assert!(matches!(err, FrameError::Truncated { .. }));
    }

    #[test]
    fn implausible_length_is_rejected_as_bad_length() {
        let mut bits = preamble_bits();
        // Claim a length of 0xFFFF with only a handful of bits following.
        push_repeated(&mut bits, &{
            let mut v = Vec::new();
            push_u16_msb(&mut v, 0xFFFF);
            v
        }, REPETITION);
        bits.extend(std::iter::repeat(false).take(24));

        let err = deframe(&bits).unwrap_err();
        assert!(matches!(err, FrameError::BadLength { .. }));
    }

    #[test]
    fn preamble_found_at_nonzero_bit_offset() {
        let payload = b"offset";
        let clean = frame(payload, 0, &mut rng()).unwrap();

        let mut offset_bits = vec![true, false, true, false, true];
        offset_bits.extend(clean.iter().copied());

        assert_eq!(deframe(&offset_bits).unwrap(), payload);
    }

    #[test]
    fn random_tail_padding_does_not_disturb_decoding() {
        let payload = b"padded frame";
        let bits = frame(payload, 4096, &mut rng()).unwrap();
        assert_eq!(deframe(&bits).unwrap(), payload);
    }

    #[test]
    fn maximum_length_payload_roundtrips() {
        let payload = vec![b'a'; MAX_PAYLOAD_LEN];
        let bits = frame(&payload, 0, &mut rng()).unwrap();
        assert_eq!(deframe(&bits).unwrap(), payload);
    }
}
