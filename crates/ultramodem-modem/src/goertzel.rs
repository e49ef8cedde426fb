//! Goertzel algorithm: single-bin DFT magnitude, evaluated in `O(N)` per
//! frequency with no FFT buffer allocation. Used once per symbol per
//! candidate tone to score which of `freq_0`/`freq_1` is present.

use std::f64::consts::PI;

/// Energy of `samples` at `target_freq`, normalized by block length.
///
/// `sample_rate` and `target_freq` are both in Hz. Returns a magnitude-like
/// quantity (not power-normalized to a physical unit); only relative
/// comparisons between two calls on the same block length are meaningful,
/// which is exactly how [`crate::demodulator::Demodulator`] uses it.
#[must_use]
pub fn goertzel_magnitude(samples: &[f32], sample_rate: u32, target_freq: f64) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }

    let k = (n as f64 * target_freq) / f64::from(sample_rate);
    let omega = 2.0 * PI * k / n as f64;
    let coeff = 2.0 * omega.cos();

    let mut q0;
    let mut q1 = 0.0_f64;
    let mut q2 = 0.0_f64;

    for &sample in samples {
        q0 = coeff.mul_add(q1, f64::from(sample)) - q2;
        q2 = q1;
        q1 = q0;
    }

    (q1 * q1 + q2 * q2 - coeff * q1 * q2).sqrt()
}
