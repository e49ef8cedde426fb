//! Embedding and recovering ultramodem commands in host PCM audio.
//!
//! This crate covers C5 (Embedder / Extractor) and the two top-level
//! convenience entry points, [`encode_command`] and [`decode_command`],
//! that compose C1 through C5 in a single call each.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod embedder;
mod error;

use rand::RngCore;
use ultramodem_crypto::{Cipher, CiphertextBlob};
use ultramodem_modem::{Demodulator, ModemConfig};

pub use embedder::{LengthPolicy, downmix_to_mono, embed};
pub use error::{DecodeError, EmbedError};

/// Options controlling [`encode_command`]'s channel handling and framing.
#[derive(Debug, Clone, Copy)]
pub struct EmbedOptions {
    /// Interleaved channel count of the host PCM buffer.
    pub channels: usize,
    /// Frame offset, within the host buffer, where the modem signal
    /// begins.
    pub offset: usize,
    /// What to do if the host buffer is shorter than the modem signal.
    pub policy: LengthPolicy,
    /// Minimum total bit-stream length passed to the framer (see
    /// [`ultramodem_proto::frame`]'s padding behavior).
    pub min_total_bits: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            channels: 1,
            offset: 0,
            policy: LengthPolicy::ExtendWithSilence,
            min_total_bits: 0,
        }
    }
}

/// The result of [`encode_command`]: the new PCM buffer, plus whether the
/// embedding-verification pass (spec §4.5 step 6) confirmed the command
/// round-trips from the buffer just produced.
#[derive(Debug, Clone)]
pub struct EmbedOutcome {
    /// Host PCM with the modem signal mixed in.
    pub pcm: Vec<f32>,
    /// `true` if decoding `pcm` recovers the original command bytes.
    /// `false` means the buffer was still emitted — per spec, a verify
    /// failure is a warning, not a hard error — but a caller piping it
    /// through a lossy codec downstream should expect trouble.
    pub verified: bool,
}

/// Runs Cipher, obfuscation, Framer, and Modulator over `command`, then
/// mixes the result into `host_pcm`.
///
/// # Errors
///
/// [`EmbedError::PayloadTooLarge`] if the obfuscated ciphertext does not
/// fit in one frame; [`EmbedError::HostTooShort`] if `host_pcm` is
/// shorter than the modem signal and `options.policy` is
/// [`LengthPolicy::Reject`].
#[tracing::instrument(skip(cipher, host_pcm, command, rng), fields(host_len = host_pcm.len(), command_len = command.len()))]
pub fn encode_command(
    cipher: &Cipher,
    config: ModemConfig,
    host_pcm: &[f32],
    command: &str,
    options: &EmbedOptions,
    rng: &mut impl RngCore,
) -> Result<EmbedOutcome, EmbedError> {
    let ciphertext = cipher.encrypt(command.as_bytes());
    let obfuscated = ultramodem_crypto::obfuscate(ciphertext.as_bytes(), rng);
    let bits = ultramodem_proto::frame(&obfuscated, options.min_total_bits, rng)?;
    let modem_signal = ultramodem_modem::modulate(&bits, &config);

    let pcm = embedder::embed(host_pcm, options.channels, &modem_signal, options.offset, options.policy)?;

    let verified = {
        let mut demod = Demodulator::new(config);
        let no_cancel: Option<&dyn Fn() -> bool> = None;
        decode_command(cipher, &mut demod, &pcm, options.channels, no_cancel)
            .map(|recovered| recovered == command)
            .unwrap_or(false)
    };

    tracing::debug!(verified, "embedding-verification pass complete");
    Ok(EmbedOutcome { pcm, verified })
}

/// Bandpass-filters `pcm` through the demodulator's filter stage (spec
/// §4.5's `extract`), for callers that want to inspect the ultrasonic
/// band without running the full decode pipeline.
#[must_use]
pub fn extract(pcm: &[f32], channels: usize, config: &ModemConfig) -> Vec<f32> {
    let mono = downmix_to_mono(pcm, channels);
    let mut filter = ultramodem_modem::BandpassFilter::new(
        config.sample_rate(),
        config.center_freq(),
        config.passband_half_width(),
    );
    let mut filtered = mono;
    filter.process(&mut filtered);
    filtered
}

/// Runs the full inverse pipeline (channel downmix, Demodulator, Framer,
/// Cipher) and returns the recovered command string.
///
/// `cancel`, if supplied, is checked once per second of processed audio
/// during the channel-downmix stage; on a `true` result the call returns
/// [`DecodeError::Cancelled`] without running the (comparatively cheap)
/// demodulation stage at all.
///
/// # Errors
///
/// See [`DecodeError`]'s variants for each pipeline stage's failure mode.
#[tracing::instrument(skip(cipher, demod, pcm, cancel), fields(pcm_len = pcm.len()))]
pub fn decode_command(
    cipher: &Cipher,
    demod: &mut Demodulator,
    pcm: &[f32],
    channels: usize,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<String, DecodeError> {
    let mono = downmix_checked(pcm, channels, demod.config().sample_rate(), cancel)?;

    let payload = demod.decode_bits(&mono)?;
    let ciphertext_bytes = ultramodem_crypto::deobfuscate(&payload);
    let blob = CiphertextBlob::from_bytes(ciphertext_bytes);
    let plaintext = cipher.decrypt(&blob)?;

    String::from_utf8(plaintext).map_err(|_| DecodeError::BadUtf8)
}

/// Downmixes `pcm` to mono, checking `cancel` once per `sample_rate`
/// samples of input consumed (spec §5's "once per second of processed
/// audio" cancellation granularity).
fn downmix_checked(
    pcm: &[f32],
    channels: usize,
    sample_rate: u32,
    cancel: Option<&dyn Fn() -> bool>,
) -> Result<Vec<f32>, DecodeError> {
    let channels = channels.max(1);
    let frames_per_second = (sample_rate as usize).max(1);
    let chunk_len = frames_per_second * channels;

    let mut mono = Vec::with_capacity(pcm.len() / channels);
    for chunk in pcm.chunks(chunk_len.max(channels)) {
        if let Some(predicate) = cancel {
            if predicate() {
                return Err(DecodeError::Cancelled);
            }
        }
        mono.extend(downmix_to_mono(chunk, channels));
    }
    Ok(mono)
}
