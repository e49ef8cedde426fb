//! Mixing a modem signal into host PCM, and the reverse channel-handling
//! step for decode.

use crate::error::EmbedError;

/// What to do when the host buffer is shorter than the modem signal it
/// must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Extend the host with silence so the whole modem signal fits.
    #[default]
    ExtendWithSilence,
    /// Return [`EmbedError::HostTooShort`] instead of extending.
    Reject,
}

/// Mixes `modem_signal` into every channel of `host_pcm` starting at
/// frame `offset`, saturating to `[-1, 1]` as a clipping backstop.
///
/// `host_pcm` is interleaved with `channels` channels per frame. If the
/// host does not have enough frames to carry the whole signal, `policy`
/// decides whether the host is silently extended or the call fails.
pub fn embed(
    host_pcm: &[f32],
    channels: usize,
    modem_signal: &[f32],
    offset: usize,
    policy: LengthPolicy,
) -> Result<Vec<f32>, EmbedError> {
    let channels = channels.max(1);
    let host_frames = host_pcm.len() / channels;
    let needed_frames = offset + modem_signal.len();

    let mut pcm = host_pcm.to_vec();

    if host_frames < needed_frames {
        match policy {
            LengthPolicy::Reject => {
                return Err(EmbedError::HostTooShort {
                    needed: needed_frames * channels,
                    available: host_pcm.len(),
                });
            }
            LengthPolicy::ExtendWithSilence => {
                let extra_frames = needed_frames - host_frames;
                pcm.extend(std::iter::repeat(0.0_f32).take(extra_frames * channels));
            }
        }
    }

    for (i, &sample) in modem_signal.iter().enumerate() {
        let frame = offset + i;
        for channel in 0..channels {
            let idx = frame * channels + channel;
            pcm[idx] = (pcm[idx] + sample).clamp(-1.0, 1.0);
        }
    }

    Ok(pcm)
}

/// Downmixes interleaved multichannel PCM to mono by averaging each
/// frame's channels. A no-op copy when `channels <= 1`.
#[must_use]
pub fn downmix_to_mono(pcm: &[f32], channels: usize) -> Vec<f32> {
    let channels = channels.max(1);
    pcm.chunks(channels).map(|frame| frame.iter().sum::<f32>() / frame.len() as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_adds_signal_to_every_channel() {
        let host = vec![0.0_f32; 8]; // 4 stereo frames
        let signal = vec![0.1, 0.2];
        let out = embed(&host, 2, &signal, 0, LengthPolicy::ExtendWithSilence).expect("fits");
        assert_eq!(&out[0..4], &[0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn embed_respects_a_nonzero_offset() {
        let host = vec![0.0_f32; 4]; // mono, 4 frames
        let signal = vec![0.5];
        let out = embed(&host, 1, &signal, 2, LengthPolicy::ExtendWithSilence).expect("fits");
        assert_eq!(out, vec![0.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn short_host_extends_with_silence_by_default() {
        let host = vec![0.0_f32; 2];
        let signal = vec![0.1, 0.2, 0.3, 0.4];
        let out = embed(&host, 1, &signal, 0, LengthPolicy::ExtendWithSilence).expect("extends");
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn short_host_rejected_under_reject_policy() {
        let host = vec![0.0_f32; 2];
        let signal = vec![0.1, 0.2, 0.3, 0.4];
        let err = embed(&host, 1, &signal, 0, LengthPolicy::Reject).unwrap_err();
        assert_eq!(err, EmbedError::HostTooShort { needed: 4, available: 2 });
    }

    #[test]
    fn clips_to_the_valid_pcm_range() {
        let host = vec![0.95_f32];
        let signal = vec![0.2];
        let out = embed(&host, 1, &signal, 0, LengthPolicy::ExtendWithSilence).expect("fits");
        assert_eq!(out, vec![1.0]);
    }

    #[test]
    fn downmix_averages_channels() {
        let stereo = vec![1.0, -1.0, 0.5, 0.5];
        assert_eq!(downmix_to_mono(&stereo, 2), vec![0.0, 0.5]);
    }

    #[test]
    fn downmix_is_identity_for_mono() {
        let mono = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix_to_mono(&mono, 1), mono);
    }
}
