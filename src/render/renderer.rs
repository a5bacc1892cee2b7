use std::path::PathBuf;

use rayon::prelude::*;

use crate::assets::media::AudioPcm;
use crate::audio::mix::write_mix_to_f32le_file;
use crate::compose::clip::ComposedClip;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRange, Resolution};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Ordered clips plus the soundtrack to mux under them.
#[derive(Clone, Debug)]
pub struct RenderPlan {
    pub clips: Vec<ComposedClip>,
    pub audio: Option<AudioPcm>,
    pub fps: Fps,
    pub resolution: Resolution,
}

impl RenderPlan {
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }
}

#[derive(Clone, Debug)]
/// Threading and chunking controls for timeline rendering.
pub struct RenderThreading {
    /// Render each chunk on a rayon pool when `true`.
    pub parallel: bool,
    /// Frames per scheduling chunk.
    pub chunk_size: usize,
    /// Explicit worker count; rayon's default when `None`.
    pub threads: Option<usize>,
    /// Render static clips once and repeat the frame.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Counters reported after a render.
pub struct RenderStats {
    pub segments: usize,
    pub frames_total: u64,
    pub frames_rendered: u64,
    /// Frames reused from an earlier render of the same static clip.
    pub frames_elided: u64,
    pub procedural_backgrounds: usize,
    pub music_layered: bool,
}

/// Frame ranges of consecutive clips, from rounded cumulative boundaries.
///
/// The last range ends at `round(sum(durations) * fps)`, so rounding never accumulates. A clip
/// shorter than half a frame borrows one from its neighbour, so every caption is shown whenever
/// the timeline has at least one frame per clip.
pub fn clip_frame_ranges(durations: &[f64], fps: Fps) -> Vec<FrameRange> {
    let mut cum = 0.0f64;
    let mut ends: Vec<u64> = durations
        .iter()
        .map(|d| {
            cum += d.max(0.0);
            fps.secs_to_frames_round(cum)
        })
        .collect();
    let total = ends.last().copied().unwrap_or(0);
    let n = ends.len() as u64;

    if total >= n {
        let mut prev = 0u64;
        for (i, end) in ends.iter_mut().enumerate() {
            let latest = total - (n - 1 - i as u64);
            *end = (*end).max(prev + 1).min(latest);
            prev = *end;
        }
    } else {
        let mut prev = 0u64;
        for end in ends.iter_mut() {
            *end = (*end).max(prev);
            prev = *end;
        }
    }

    let mut start = 0u64;
    let ranges: Vec<FrameRange> = ends
        .into_iter()
        .map(|end| {
            let range = FrameRange {
                start: FrameIndex(start),
                end: FrameIndex(end),
            };
            start = end;
            range
        })
        .collect();

    let empty = ranges.iter().filter(|r| r.len_frames() == 0).count();
    if empty > 0 {
        tracing::warn!(
            empty,
            clips = ranges.len(),
            frames = total,
            "timeline has fewer frames than clips, some segments are never shown"
        );
    }
    ranges
}

/// Normalized position of local frame `j` within a clip of `duration` seconds.
pub fn clip_progress(j: u64, fps: Fps, duration: f64) -> f32 {
    if !(duration > 0.0) {
        return 0.0;
    }
    (fps.frames_to_secs(j) / duration).clamp(0.0, 1.0) as f32
}

enum Slot {
    Job(usize),
    Cached,
}

/// Render every clip of `plan` in order into `sink`.
#[tracing::instrument(skip_all, fields(clips = plan.clips.len(), parallel = threading.parallel))]
pub fn render_plan(
    plan: &RenderPlan,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> ReelResult<RenderStats> {
    if plan.clips.is_empty() {
        return Err(ReelError::validation("render plan has no clips"));
    }
    if let Some(clip) = plan.clips.iter().find(|c| c.resolution != plan.resolution) {
        return Err(ReelError::composition(format!(
            "clip resolution {}x{} does not match output {}x{}",
            clip.resolution.width,
            clip.resolution.height,
            plan.resolution.width,
            plan.resolution.height
        )));
    }

    let durations: Vec<f64> = plan.clips.iter().map(|c| c.duration).collect();
    let ranges = clip_frame_ranges(&durations, plan.fps);
    let total = ranges.last().map(|r| r.end.0).unwrap_or(0);
    if total == 0 {
        return Err(ReelError::validation("render plan is shorter than one frame"));
    }

    let mut audio_tmp = TempFileGuard(None);
    let audio = match plan.audio.as_ref().filter(|a| !a.is_empty()) {
        Some(pcm) => {
            let path = temp_audio_path();
            audio_tmp.0 = Some(path.clone());
            write_mix_to_f32le_file(&pcm.interleaved_f32, &path)?;
            Some(AudioInputConfig {
                path,
                sample_rate: pcm.sample_rate,
                channels: pcm.channels,
            })
        }
        None => None,
    };

    sink.begin(SinkConfig {
        resolution: plan.resolution,
        fps: plan.fps,
        audio,
    })?;

    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let mut stats = RenderStats {
        segments: plan.clips.len(),
        frames_total: total,
        procedural_backgrounds: plan.clips.iter().filter(|c| c.is_static()).count(),
        ..RenderStats::default()
    };
    let mut cached: Option<(usize, FrameRGBA)> = None;
    let mut ci = 0usize;

    let mut chunk_start = 0u64;
    while chunk_start < total {
        let chunk_end = (chunk_start + chunk_size).min(total);

        let mut jobs = Vec::<(usize, f32)>::new();
        let mut slots = Vec::<(usize, Slot)>::with_capacity((chunk_end - chunk_start) as usize);
        let mut static_job: Option<(usize, usize)> = None;
        for f in chunk_start..chunk_end {
            while ranges[ci].end.0 <= f {
                ci += 1;
            }
            let clip = &plan.clips[ci];
            if threading.static_frame_elision && clip.is_static() {
                if cached.as_ref().is_some_and(|(c, _)| *c == ci) {
                    slots.push((ci, Slot::Cached));
                    continue;
                }
                if let Some((c, job)) = static_job
                    && c == ci
                {
                    slots.push((ci, Slot::Job(job)));
                    continue;
                }
                static_job = Some((ci, jobs.len()));
            }
            let progress = clip_progress(f - ranges[ci].start.0, plan.fps, clip.duration);
            slots.push((ci, Slot::Job(jobs.len())));
            jobs.push((ci, progress));
        }

        let render_job = |&(c, p): &(usize, f32)| plan.clips[c].render_frame(p);
        let rendered: Vec<FrameRGBA> = match pool.as_ref() {
            Some(pool) => pool.install(|| {
                jobs.par_iter()
                    .map(render_job)
                    .collect::<ReelResult<Vec<_>>>()
            })?,
            None => jobs.iter().map(render_job).collect::<ReelResult<Vec<_>>>()?,
        };

        for (offset, (c, slot)) in slots.iter().enumerate() {
            let idx = FrameIndex(chunk_start + offset as u64);
            match slot {
                Slot::Job(k) => {
                    let frame = rendered.get(*k).ok_or_else(|| {
                        ReelError::composition("internal error: rendered frame index out of range")
                    })?;
                    sink.push_frame(idx, frame)?;
                    if static_job == Some((*c, *k))
                        && cached.as_ref().is_none_or(|(cc, _)| cc != c)
                    {
                        cached = Some((*c, frame.clone()));
                    }
                }
                Slot::Cached => {
                    let (_, frame) = cached.as_ref().ok_or_else(|| {
                        ReelError::composition("internal error: static frame cache is empty")
                    })?;
                    sink.push_frame(idx, frame)?;
                }
            }
        }

        stats.frames_rendered += jobs.len() as u64;
        tracing::debug!(
            frames = chunk_end,
            total,
            rendered = jobs.len(),
            "rendered chunk"
        );
        chunk_start = chunk_end;
    }
    stats.frames_elided = stats.frames_total - stats.frames_rendered;

    sink.end()?;
    drop(audio_tmp);
    tracing::info!(
        frames = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "render complete"
    );
    Ok(stats)
}

fn temp_audio_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "nightreel_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::composition(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
