use std::sync::Arc;

use crate::assets::media::AudioPcm;

#[derive(Clone, Debug)]
/// One scheduled audio contribution in timeline sample space.
pub struct AudioSegment {
    pub timeline_start_sample: u64,
    pub timeline_end_sample: u64,
    pub volume: f32,
    pub fade_in_sec: f64,
    pub fade_out_sec: f64,
    pub source: Arc<AudioPcm>,
}

impl AudioSegment {
    /// Play `source` from the timeline start at unit gain, cut at `total_samples`.
    pub fn full(source: Arc<AudioPcm>, total_samples: u64) -> Self {
        Self {
            timeline_start_sample: 0,
            timeline_end_sample: total_samples,
            volume: 1.0,
            fade_in_sec: 0.0,
            fade_out_sec: 0.0,
            source,
        }
    }
}

#[derive(Clone, Debug)]
/// Mixing plan for one output stream.
pub struct AudioManifest {
    pub sample_rate: u32,
    pub channels: u16,
    pub total_samples: u64,
    pub segments: Vec<AudioSegment>,
}

impl AudioManifest {
    pub fn new(sample_rate: u32, channels: u16, total_samples: u64) -> Self {
        Self {
            sample_rate,
            channels,
            total_samples,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: AudioSegment) {
        self.segments.push(segment);
    }
}
