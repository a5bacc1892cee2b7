use std::path::Path;

use crate::audio::manifest::{AudioManifest, AudioSegment};
use crate::foundation::error::{ReelError, ReelResult};

/// Sum all manifest segments into interleaved output PCM, clamped to `[-1, 1]`.
pub fn mix_manifest(manifest: &AudioManifest) -> ReelResult<Vec<f32>> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        if seg.source.sample_rate != manifest.sample_rate {
            return Err(ReelError::composition(format!(
                "audio segment at {} Hz cannot be mixed into a {} Hz stream",
                seg.source.sample_rate, manifest.sample_rate
            )));
        }
        if seg.source.channels == 0 {
            return Err(ReelError::composition("audio segment has zero channels"));
        }
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    Ok(out)
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let end = seg.timeline_end_sample.min(manifest.total_samples);
    if end <= seg.timeline_start_sample {
        return;
    }
    let seg_len_sec = (end - seg.timeline_start_sample) as f64 / f64::from(manifest.sample_rate);

    let src = &seg.source.interleaved_f32;
    let src_channels = usize::from(seg.source.channels);
    let src_frames = src.len() / src_channels;
    let out_channels = usize::from(manifest.channels);

    for dst_sample in seg.timeline_start_sample..end {
        let rel = (dst_sample - seg.timeline_start_sample) as usize;
        if rel >= src_frames {
            break;
        }
        let rel_sec = rel as f64 / f64::from(manifest.sample_rate);
        let gain = seg.volume * fade_gain(rel_sec, seg_len_sec, seg.fade_in_sec, seg.fade_out_sec);

        let si = rel * src_channels;
        let (l, r) = if src_channels == 1 {
            (src[si], src[si])
        } else {
            (src[si], src[si + 1])
        };

        let di = dst_sample as usize * out_channels;
        out[di] += l * gain;
        if out_channels > 1 {
            out[di + 1] += r * gain;
        }
    }
}

/// Linear fade-in from 0 and fade-out to 0 over a `len_sec` clip.
pub fn fade_gain(rel_sec: f64, len_sec: f64, fade_in_sec: f64, fade_out_sec: f64) -> f32 {
    let mut gain = 1.0f32;
    if fade_in_sec > 0.0 {
        gain *= (rel_sec / fade_in_sec).clamp(0.0, 1.0) as f32;
    }
    if fade_out_sec > 0.0 {
        let rem = (len_sec - rel_sec).max(0.0);
        gain *= (rem / fade_out_sec).clamp(0.0, 1.0) as f32;
    }
    gain
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::encode(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::encode(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
