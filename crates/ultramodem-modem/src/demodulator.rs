//! The demodulation pipeline: bandpass filter, energy gate, preamble
//! correlation sync, symbol slicing, Goertzel discrimination, and a
//! terminal call into the framer.

use crate::config::ModemConfig;
use crate::error::DemodError;
use crate::filter::BandpassFilter;
use crate::goertzel::goertzel_magnitude;
use crate::modulator::modulate;
use crate::state::DemodulatorState;

/// Fraction, of a perfectly-matched preamble's self-correlation energy,
/// that an observed correlation peak must reach to count as a lock
/// rather than noise. Mirrors spec §4.4 step 3's "above a fraction (e.g.
/// 50%)" language, anchored to the template's own energy rather than the
/// observed correlation's own maximum (which would trivially always pass
/// at the true peak).
const PREAMBLE_LOCK_FRACTION: f64 = 0.5;

/// Small constant avoiding division by zero in the per-symbol confidence
/// normalization of spec §4.4 step 6.
const CONFIDENCE_EPSILON: f64 = 1e-9;

/// Recovers bits, then a framed payload, from a PCM buffer.
///
/// Holds only the immutable [`ModemConfig`] and a reusable
/// [`BandpassFilter`] scratch buffer — no state survives across calls
/// beyond that filter's internal coefficients (its sample history is
/// reset at the start of every `decode`/`decode_bits` call, so repeated
/// calls behave identically regardless of call order).
#[derive(Debug, Clone)]
pub struct Demodulator {
    config: ModemConfig,
    filter: BandpassFilter,
}

impl Demodulator {
    /// Builds a demodulator for `config`, sizing its bandpass filter
    /// around the configured tone pair once, up front.
    #[must_use]
    pub fn new(config: ModemConfig) -> Self {
        let filter =
            BandpassFilter::new(config.sample_rate(), config.center_freq(), config.passband_half_width());
        Self { config, filter }
    }

    /// The configuration this demodulator was built with.
    #[must_use]
    pub fn config(&self) -> ModemConfig {
        self.config
    }

    /// Runs the full pipeline and reports the terminal [`DemodulatorState`].
    ///
    /// A thin, infallible wrapper around [`Self::decode_bits`] for callers
    /// that want the state-machine shape rather than a bare `Result`.
    #[tracing::instrument(skip(self, pcm), fields(samples = pcm.len()))]
    pub fn decode(&mut self, pcm: &[f32]) -> DemodulatorState {
        match self.decode_bits(pcm) {
            Ok(payload) => DemodulatorState::Decoded { payload },
            Err(err) => DemodulatorState::Failed(err),
        }
    }

    /// Runs the full pipeline and returns the recovered payload bytes, or
    /// the [`DemodError`] of whichever stage failed.
    ///
    /// This is the terminal stage spec §4.4 describes: bits recovered
    /// from the PCM buffer are handed straight to
    /// [`ultramodem_proto::deframe`], so a malformed or corrupted frame
    /// surfaces as [`DemodError::DeframeFailed`] rather than a bare bit
    /// vector.
    #[tracing::instrument(skip(self, pcm), fields(samples = pcm.len()))]
    pub fn decode_bits(&mut self, pcm: &[f32]) -> Result<Vec<u8>, DemodError> {
        let (bits, confidence) = self.demodulate_symbols(pcm)?;
        tracing::debug!(mean_confidence = confidence, "demodulated symbol stream");
        let payload = ultramodem_proto::deframe(&bits)?;
        Ok(payload)
    }

    /// Runs steps 1-6 of spec §4.4, returning the raw (still
    /// preamble-prefixed) bit stream and its mean per-symbol confidence.
    fn demodulate_symbols(&mut self, pcm: &[f32]) -> Result<(Vec<bool>, f32), DemodError> {
        let samples_per_bit = self.config.samples_per_bit();

        let mut filtered = pcm.to_vec();
        self.filter.reset();
        self.filter.process(&mut filtered);

        let windows = window_rms(&filtered, samples_per_bit);
        let threshold = self.config.detection_threshold();
        if windows.iter().cloned().fold(0.0_f32, f32::max) < threshold {
            return Err(DemodError::BelowThreshold);
        }

        // Restrict the correlation search to the region the energy gate
        // actually flagged (plus a small margin), rather than the whole
        // buffer: real signals are a short burst inside a much longer
        // recording, and a full O(buffer_len * template_len) correlation
        // over minutes of mostly-silent audio would dwarf the "tens to
        // hundreds of milliseconds" budget a one-minute buffer allows.
        let template = modulate(&preamble_bits(), &self.config);
        let (search_start, search_end) =
            active_search_range(&windows, samples_per_bit, filtered.len(), template.len(), threshold);

        let preamble_start = find_preamble_start(&filtered[search_start..search_end], &template)
            .map(|offset| offset + search_start)
            .ok_or(DemodError::NoPreamble)?;

        let remaining = &filtered[preamble_start..];
        let symbol_count = remaining.len() / samples_per_bit;

        let mut bits = Vec::with_capacity(symbol_count);
        let mut confidence_sum = 0.0_f64;

        for i in 0..symbol_count {
            let symbol = &remaining[i * samples_per_bit..(i + 1) * samples_per_bit];
            let mag0 = goertzel_magnitude(symbol, self.config.sample_rate(), self.config.freq_0());
            let mag1 = goertzel_magnitude(symbol, self.config.sample_rate(), self.config.freq_1());

            bits.push(mag1 > mag0);
            confidence_sum += (mag1 - mag0).abs() / (mag0 + mag1 + CONFIDENCE_EPSILON);
        }

        let mean_confidence =
            if symbol_count == 0 { 0.0 } else { (confidence_sum / symbol_count as f64) as f32 };

        Ok((bits, mean_confidence))
    }
}

/// `PREAMBLE` as an MSB-first bit vector, matching
/// [`ultramodem_proto::PREAMBLE_LEN`] bits.
fn preamble_bits() -> Vec<bool> {
    (0..ultramodem_proto::PREAMBLE_LEN)
        .map(|i| (ultramodem_proto::PREAMBLE >> (ultramodem_proto::PREAMBLE_LEN - 1 - i)) & 1 == 1)
        .collect()
}

/// Short-time RMS of `samples`, one value per non-overlapping
/// `window`-sized chunk (spec §4.4 step 2). The maximum of this vector is
/// the "peak RMS" the energy gate compares against `detection_threshold`.
fn window_rms(samples: &[f32], window: usize) -> Vec<f32> {
    if window == 0 || samples.is_empty() {
        return Vec::new();
    }
    samples
        .chunks(window)
        .map(|chunk| {
            let sum_sq: f64 = chunk.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            ((sum_sq / chunk.len() as f64).sqrt()) as f32
        })
        .collect()
}

/// Sample-index range `[start, end)` to run preamble correlation over.
///
/// The preamble is always the very first thing `frame()` emits, so it
/// only ever begins near the *leading* edge of the first window whose
/// RMS reached `threshold` — never searching the rest of the
/// transmission, however long, keeps this bounded by a handful of
/// windows plus the template length regardless of payload size.
fn active_search_range(
    windows: &[f32],
    window_len: usize,
    total_len: usize,
    template_len: usize,
    threshold: f32,
) -> (usize, usize) {
    match windows.iter().position(|&rms| rms >= threshold) {
        Some(first) => {
            let start = first.saturating_sub(1) * window_len;
            let end = (start + template_len + 4 * window_len).min(total_len);
            (start, end.max(start))
        }
        None => (0, total_len),
    }
}

/// Cross-correlates `template` against `filtered` at every valid offset
/// and returns the earliest offset whose peak magnitude reaches
/// [`PREAMBLE_LOCK_FRACTION`] of the template's own self-correlation
/// energy, or `None` if no offset qualifies.
fn find_preamble_start(filtered: &[f32], template: &[f32]) -> Option<usize> {
    if template.is_empty() || filtered.len() < template.len() {
        return None;
    }

    let template_energy: f64 = template.iter().map(|&t| f64::from(t) * f64::from(t)).sum();
    let threshold = PREAMBLE_LOCK_FRACTION * template_energy;

    let mut best: Option<(usize, f64)> = None;
    for start in 0..=(filtered.len() - template.len()) {
        let corr: f64 = filtered[start..start + template.len()]
            .iter()
            .zip(template)
            .map(|(&a, &b)| f64::from(a) * f64::from(b))
            .sum();
        let corr_abs = corr.abs();

        let is_better = match best {
            Some((_, best_val)) => corr_abs > best_val,
            None => true,
        };
        if is_better {
            best = Some((start, corr_abs));
        }
    }

    best.filter(|&(_, val)| val >= threshold).map(|(idx, _)| idx)
}
