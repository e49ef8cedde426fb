//! Optional structural obfuscation wrapper.
//!
//! Obfuscation is signaling, not security: it hides the fact that a blob is
//! an `ultramodem` ciphertext from casual inspection by wrapping it in a
//! random-length header and trailer. It provides no cryptographic guarantee
//! on its own and `deobfuscate` is tolerant of absent or malformed wrapping.

use rand::RngCore;

/// 4-byte ASCII tag marking an obfuscated blob.
pub const MAGIC: [u8; 4] = *b"OBF1";

/// Minimum size of an obfuscated blob: a zero-padding header plus a
/// zero-padding trailer (`5 + 5` bytes).
const MIN_WRAPPED_LEN: usize = 10;

/// Wraps `blob` with a random-length header and trailer.
///
/// Layout: `MAGIC(4) || PADLEN(1) || PAD(PADLEN)` as a prefix, and the
/// mirror-ordered `PAD(PADLEN) || PADLEN(1) || MAGIC(4)` as a suffix — the
/// trailer's fields are reversed relative to the header's so that
/// [`deobfuscate`] can parse it from the end of the buffer without having to
/// search for where the inner payload ends.
///
/// The header and trailer pad lengths are drawn independently from `rng`;
/// their content is random filler with no semantic meaning.
pub fn obfuscate(blob: &[u8], rng: &mut impl RngCore) -> Vec<u8> {
    let header_pad = random_pad(rng);
    let trailer_pad = random_pad(rng);

    let mut wrapped =
        Vec::with_capacity(5 + header_pad.len() + blob.len() + trailer_pad.len() + 5);

    wrapped.extend_from_slice(&MAGIC);
    #[allow(clippy::cast_possible_truncation)] // random_pad bounds len to u8::MAX
    wrapped.push(header_pad.len() as u8);
    wrapped.extend_from_slice(&header_pad);

    wrapped.extend_from_slice(blob);

    wrapped.extend_from_slice(&trailer_pad);
    #[allow(clippy::cast_possible_truncation)]
    wrapped.push(trailer_pad.len() as u8);
    wrapped.extend_from_slice(&MAGIC);

    wrapped
}

/// Removes the obfuscation wrapper if present; otherwise returns `blob`
/// unchanged.
///
/// Returns the inner blob only if both the header and trailer `MAGIC` tags
/// verify and the claimed pad lengths are consistent with the buffer's
/// actual length. Any other input — absent magic, truncated padding,
/// inconsistent lengths — is returned as-is: obfuscation is optional
/// signaling, so a caller that sent a bare [`crate::CiphertextBlob`] must
/// still round-trip through `deobfuscate` unharmed.
#[must_use]
pub fn deobfuscate(blob: &[u8]) -> Vec<u8> {
    deobfuscate_inner(blob).unwrap_or_else(|| blob.to_vec())
}

fn deobfuscate_inner(blob: &[u8]) -> Option<Vec<u8>> {
    if blob.len() < MIN_WRAPPED_LEN {
        return None;
    }
    if blob[0..4] != MAGIC {
        return None;
    }
    if blob[blob.len() - 4..] != MAGIC {
        return None;
    }

    let header_padlen = blob[4] as usize;
    let header_len = 5 + header_padlen;

    let trailer_padlen = blob[blob.len() - 5] as usize;
    let trailer_len = 5 + trailer_padlen;

    let total_wrapper = header_len.checked_add(trailer_len)?;
    if total_wrapper > blob.len() {
        return None;
    }

    Some(blob[header_len..blob.len() - trailer_len].to_vec())
}

fn random_pad(rng: &mut impl RngCore) -> Vec<u8> {
    let len = usize::from(rng.next_u32() as u8);
    let mut pad = vec![0u8; len];
    rng.fill_bytes(&mut pad);
    pad
}
