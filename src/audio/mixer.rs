use std::path::Path;
use std::sync::Arc;

use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::audio::bed::fit_music_bed;
use crate::audio::manifest::{AudioManifest, AudioSegment};
use crate::audio::mix::mix_manifest;
use crate::foundation::error::{ReelError, ReelResult};

/// Mixed stream plus whether music actually made it in.
#[derive(Clone, Debug)]
pub struct MixOutcome {
    pub pcm: AudioPcm,
    pub music_layered: bool,
}

/// Layers narration with an optional music bed. Music problems never fail the mix.
#[derive(Clone, Debug)]
pub struct AudioMixer {
    pub sample_rate: u32,
    pub music_volume: f32,
}

impl AudioMixer {
    pub fn new(music_volume: f32) -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            music_volume,
        }
    }

    /// Output length is `round(narration_secs * sample_rate)`; narration is padded or cut.
    pub fn mix_pcm(
        &self,
        narration: &AudioPcm,
        narration_secs: f64,
        music: Option<&AudioPcm>,
    ) -> ReelResult<MixOutcome> {
        if !narration_secs.is_finite() || narration_secs <= 0.0 {
            return Err(ReelError::validation("narration duration must be finite and > 0"));
        }
        if narration.sample_rate != self.sample_rate || narration.channels == 0 {
            return Err(ReelError::composition(format!(
                "narration must be decoded at {} Hz, got {} Hz x{}",
                self.sample_rate, narration.sample_rate, narration.channels
            )));
        }
        let total = (narration_secs * f64::from(self.sample_rate)).round() as u64;

        let narration_only = || -> ReelResult<MixOutcome> {
            let mut manifest = AudioManifest::new(self.sample_rate, 2, total);
            manifest.push(AudioSegment::full(Arc::new(narration.clone()), total));
            Ok(MixOutcome {
                pcm: self.pcm(mix_manifest(&manifest)?),
                music_layered: false,
            })
        };

        let Some(music) = music else {
            return narration_only();
        };
        match self.layer(narration, narration_secs, music, total) {
            Ok(samples) => Ok(MixOutcome {
                pcm: self.pcm(samples),
                music_layered: true,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "music layering failed, using narration only");
                narration_only()
            }
        }
    }

    fn layer(
        &self,
        narration: &AudioPcm,
        narration_secs: f64,
        music: &AudioPcm,
        total: u64,
    ) -> ReelResult<Vec<f32>> {
        if music.sample_rate != self.sample_rate {
            return Err(ReelError::composition(format!(
                "music decoded at {} Hz, expected {}",
                music.sample_rate, self.sample_rate
            )));
        }
        let bed = fit_music_bed(music, narration_secs, self.music_volume)?;
        let mut manifest = AudioManifest::new(self.sample_rate, 2, total);
        manifest.push(AudioSegment::full(Arc::new(narration.clone()), total));
        manifest.push(AudioSegment::full(Arc::new(bed), total));
        mix_manifest(&manifest)
    }

    fn pcm(&self, interleaved_f32: Vec<f32>) -> AudioPcm {
        AudioPcm {
            sample_rate: self.sample_rate,
            channels: 2,
            interleaved_f32,
        }
    }

    /// Decode and mix. A narration decode failure is fatal; a music decode failure is not.
    #[tracing::instrument(skip(self), fields(music = music.is_some()))]
    pub fn mix_files(
        &self,
        narration: &Path,
        narration_secs: f64,
        music: Option<&Path>,
    ) -> ReelResult<MixOutcome> {
        let voice = decode_audio_f32_stereo(narration, self.sample_rate)?;
        let music_pcm = music.and_then(|p| match decode_audio_f32_stereo(p, self.sample_rate) {
            Ok(pcm) => Some(pcm),
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "music decode failed, skipping bed");
                None
            }
        });
        let outcome = self.mix_pcm(&voice, narration_secs, music_pcm.as_ref())?;
        tracing::info!(
            seconds = outcome.pcm.duration_secs(),
            music_layered = outcome.music_layered,
            "mixed audio"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mixer.rs"]
mod tests;
