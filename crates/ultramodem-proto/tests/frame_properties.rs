//! Property-based tests for the frame layer.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use ultramodem_proto::{deframe, frame};

proptest! {
    #[test]
    fn frame_round_trip(payload in proptest::collection::vec(any::<u8>(), 0..512), seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let bits = frame(&payload, 0, &mut rng).expect("payload within length limit");
        let recovered = deframe(&bits).expect("well-formed frame must deframe");
        prop_assert_eq!(recovered, payload);
    }

    #[test]
    fn frame_round_trip_with_padding(
        payload in proptest::collection::vec(any::<u8>(), 0..256),
        min_bits in 0usize..8192,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let bits = frame(&payload, min_bits, &mut rng).expect("payload within length limit");
        prop_assert!(bits.len() >= min_bits);
        let recovered = deframe(&bits).expect("well-formed padded frame must deframe");
        prop_assert_eq!(recovered, payload);
    }

    #[test]
    fn frame_round_trip_tolerates_one_flip_per_repetition_group(
        payload in proptest::collection::vec(any::<u8>(), 1..64),
        seed in any::<u64>(),
        flip_seed in any::<u64>(),
    ) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut bits = frame(&payload, 0, &mut rng).expect("payload within length limit");

        // Flip exactly one bit in every repetition-of-3 group in the coded
        // region (everything after the 16-bit preamble); majority vote must
        // still recover the original payload.
        let mut flip_rng = ChaCha20Rng::seed_from_u64(flip_seed);
        let preamble_len = ultramodem_proto::PREAMBLE_LEN;
        let mut i = preamble_len;
        while i + 3 <= bits.len() {
            use rand::Rng;
            let offset = flip_rng.gen_range(0..3);
            bits[i + offset] = !bits[i + offset];
            i += 3;
        }

        let recovered = deframe(&bits).expect("majority vote must tolerate one flip per group");
        prop_assert_eq!(recovered, payload);
    }
}

/// Spec property 4: in a uniformly random bit stream, `deframe` must not
/// falsely lock onto a preamble-shaped coincidence often enough to matter.
/// `find_preamble`'s bounded search window (`MAX_PREAMBLE_SEARCH_BITS`)
/// already caps the per-stream false-lock probability near
/// `MAX_PREAMBLE_SEARCH_BITS / 2^16`; this samples many independent random
/// streams and checks the observed rate stays far below 1-in-20, leaving
/// headroom against flakiness while still catching a badly broken bound.
#[test]
fn random_bit_streams_rarely_produce_a_false_preamble_lock() {
    use rand::Rng;

    let mut rng = ChaCha20Rng::seed_from_u64(0xF15E_C0DE);
    let trials = 5_000;
    let mut locks = 0;

    for _ in 0..trials {
        let bits: Vec<bool> = (0..256).map(|_| rng.gen_bool(0.5)).collect();
        if deframe(&bits).is_ok() {
            locks += 1;
        }
    }

    let rate = f64::from(locks) / f64::from(trials);
    assert!(rate < 0.05, "false-lock rate {rate} over {trials} random streams is implausibly high");
}
