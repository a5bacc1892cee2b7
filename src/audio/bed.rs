//! Music bed normalization: loop, trim, scale and fade a track to a target length.

use crate::assets::media::AudioPcm;
use crate::audio::mix::fade_gain;
use crate::foundation::error::{ReelError, ReelResult};

pub const MUSIC_FADE_IN_SECS: f64 = 2.0;
pub const MUSIC_FADE_OUT_SECS: f64 = 3.0;

/// Loop `music` to cover `target_secs`, trim to exactly `round(target_secs * sample_rate)`
/// frames, then apply `volume` with the bed fades.
pub fn fit_music_bed(music: &AudioPcm, target_secs: f64, volume: f32) -> ReelResult<AudioPcm> {
    if !target_secs.is_finite() || target_secs <= 0.0 {
        return Err(ReelError::validation("music bed target must be finite and > 0"));
    }
    if music.channels == 0 || music.sample_rate == 0 {
        return Err(ReelError::composition("music track has no channels or sample rate"));
    }
    let src_frames = music.frames();
    if src_frames == 0 {
        return Err(ReelError::composition("music track decoded to zero samples"));
    }

    let channels = usize::from(music.channels);
    let sr = f64::from(music.sample_rate);
    let target_frames = (target_secs * sr).round() as usize;
    let len_sec = target_frames as f64 / sr;
    let src = &music.interleaved_f32[..src_frames * channels];

    let mut out = Vec::with_capacity(target_frames * channels);
    for (frame, looped) in src.chunks_exact(channels).cycle().take(target_frames).enumerate() {
        let gain = volume
            * fade_gain(
                frame as f64 / sr,
                len_sec,
                MUSIC_FADE_IN_SECS,
                MUSIC_FADE_OUT_SECS,
            );
        out.extend(looped.iter().map(|s| s * gain));
    }

    if src_frames < target_frames {
        tracing::debug!(
            loops = target_frames.div_ceil(src_frames),
            "looped music to cover narration"
        );
    }
    Ok(AudioPcm {
        sample_rate: music.sample_rate,
        channels: music.channels,
        interleaved_f32: out,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/bed.rs"]
mod tests;
