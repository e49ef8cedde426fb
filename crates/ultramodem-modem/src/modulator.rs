//! Continuous-phase BFSK synthesis.

use crate::config::ModemConfig;
use std::f64::consts::PI;

/// Fraction of one symbol's samples spent ramping amplitude up or down at
/// its edges, via a raised-cosine window. Keeps the two tones from
/// clicking into each other at symbol boundaries without breaking the
/// running phase accumulator.
const RAMP_FRACTION: f64 = 0.1;

/// Synthesizes a continuous-phase BFSK waveform for `bits` under `config`.
///
/// Phase accumulates across the whole bit stream — each symbol picks up
/// exactly where the previous symbol's oscillator phase left off — so
/// there is no abrupt phase discontinuity at symbol boundaries, only the
/// frequency change itself. A raised-cosine amplitude ramp is applied at
/// each symbol's leading and trailing edge to tame the spectral splatter
/// that a hard frequency switch would otherwise cause.
///
/// Output length is always `bits.len() * config.samples_per_bit()`.
#[must_use]
pub fn modulate(bits: &[bool], config: &ModemConfig) -> Vec<f32> {
    let samples_per_bit = config.samples_per_bit();
    let mut out = Vec::with_capacity(bits.len() * samples_per_bit);
    let sample_rate = f64::from(config.sample_rate());
    let amplitude = f64::from(config.amplitude());

    let ramp_len = ((samples_per_bit as f64 * RAMP_FRACTION).round() as usize)
        .min(samples_per_bit / 2)
        .max(1);

    let mut phase = 0.0_f64;

    for &bit in bits {
        let freq = if bit { config.freq_1() } else { config.freq_0() };
        let phase_step = 2.0 * PI * freq / sample_rate;

        for i in 0..samples_per_bit {
            let envelope = symbol_envelope(i, samples_per_bit, ramp_len);
            out.push((amplitude * envelope * phase.sin()) as f32);
            phase += phase_step;
        }

        phase %= 2.0 * PI;
    }

    out
}

/// Raised-cosine envelope for sample index `i` of `samples_per_bit`,
/// ramping up over the first `ramp_len` samples and down over the last
/// `ramp_len`, flat at `1.0` in between.
fn symbol_envelope(i: usize, samples_per_bit: usize, ramp_len: usize) -> f64 {
    if i < ramp_len {
        0.5 * (1.0 - (PI * i as f64 / ramp_len as f64).cos())
    } else if i >= samples_per_bit - ramp_len {
        let j = samples_per_bit - 1 - i;
        0.5 * (1.0 - (PI * j as f64 / ramp_len as f64).cos())
    } else {
        1.0
    }
}
