//! Bit-level helpers shared by framing and majority-vote decoding.

/// Appends the bits of `value` (MSB-first) to `out`.
pub(crate) fn push_u16_msb(out: &mut Vec<bool>, value: u16) {
    for i in (0..16).rev() {
        out.push((value >> i) & 1 == 1);
    }
}

/// Appends the bits of `byte` (MSB-first) to `out`.
pub(crate) fn push_byte_msb(out: &mut Vec<bool>, byte: u8) {
    for i in (0..8).rev() {
        out.push((byte >> i) & 1 == 1);
    }
}

/// Appends each bit in `bits` `repeat` times consecutively.
pub(crate) fn push_repeated(out: &mut Vec<bool>, bits: &[bool], repeat: usize) {
    for &bit in bits {
        for _ in 0..repeat {
            out.push(bit);
        }
    }
}

/// Majority vote over a fixed-size group: `true` iff at least half (rounded
/// up) of `group` are `true`. For the protocol's 3-bit groups this means "at
/// least 2 of 3."
pub(crate) fn majority_vote(group: &[bool]) -> bool {
    let trues = group.iter().filter(|&&b| b).count();
    trues * 2 >= group.len()
}

/// Majority-votes `bits` in consecutive groups of `group_size`, returning one
/// output bit per group.
///
/// Returns `None` if `bits.len()` is not an exact multiple of `group_size`.
pub(crate) fn majority_vote_groups(bits: &[bool], group_size: usize) -> Option<Vec<bool>> {
    if bits.len() % group_size != 0 {
        return None;
    }
    Some(bits.chunks_exact(group_size).map(majority_vote).collect())
}

/// Reassembles MSB-first bits into bytes.
///
/// Returns `None` if `bits.len()` is not a multiple of 8.
pub(crate) fn bits_to_bytes_msb(bits: &[bool]) -> Option<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return None;
    }
    Some(
        bits.chunks_exact(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
            .collect(),
    )
}

/// Reassembles 16 MSB-first bits into a `u16`.
pub(crate) fn bits_to_u16_msb(bits: &[bool]) -> u16 {
    bits.iter().fold(0u16, |acc, &bit| (acc << 1) | u16::from(bit))
}
