//! End-to-end video creation.
//!
//! Stages run strictly in sequence: allocate segments, resolve assets, compose clips, mix
//! audio, render. Only composition and rendering use worker threads internally.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;

use crate::assets::http::{BlockingHttp, HttpFetch};
use crate::assets::resolver::{AssetResolver, AssetSet};
use crate::audio::mixer::AudioMixer;
use crate::caption::layout::CaptionStyle;
use crate::caption::painter::{GlyphPainter, VelloGlyphPainter, discover_font};
use crate::compose::pipeline::compose_segments;
use crate::config::{Config, EncodeProfile, RenderSettings};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::FrameSink;
use crate::foundation::error::ReelResult;
use crate::render::renderer::{RenderPlan, RenderStats, RenderThreading, render_plan};
use crate::script::bundle::{NarrationTrack, ScriptBundle};
use crate::script::segment::{Segment, allocate_segments};

/// Everything decided before the first frame is drawn.
pub struct PreparedVideo {
    pub segments: Vec<Segment>,
    pub assets: AssetSet,
    pub plan: RenderPlan,
    pub music_layered: bool,
}

pub struct VideoPipeline {
    settings: RenderSettings,
    style: CaptionStyle,
    mood: String,
    encode: EncodeProfile,
    resolver: AssetResolver,
    mixer: AudioMixer,
    painter: Box<dyn GlyphPainter>,
    threading: RenderThreading,
}

impl VideoPipeline {
    /// Live providers over `reqwest` and a vello caption painter on the configured font.
    pub fn new(config: &Config) -> ReelResult<Self> {
        let http: Arc<dyn HttpFetch> = Arc::new(BlockingHttp::new(&config.http)?);
        let font = discover_font(config.caption.font_path.as_deref())?;
        tracing::debug!(font = %font.display(), "caption font");
        let painter = VelloGlyphPainter::from_font_file(&font)?;
        Self::with_parts(config, AssetResolver::from_config(config, http), Box::new(painter))
    }

    pub fn with_parts(
        config: &Config,
        resolver: AssetResolver,
        painter: Box<dyn GlyphPainter>,
    ) -> ReelResult<Self> {
        config.validate()?;
        let settings = config.render_settings()?;
        Ok(Self {
            settings,
            style: CaptionStyle::from(&config.caption),
            mood: config.channel.niche.clone(),
            encode: config.encode.clone(),
            resolver,
            mixer: AudioMixer::new(settings.music_volume),
            painter,
            threading: RenderThreading::default(),
        })
    }

    pub fn with_threading(mut self, threading: RenderThreading) -> Self {
        self.threading = threading;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render `bundle` narrated by `narration` into `out`, returning the written path.
    pub fn create_video(
        &mut self,
        bundle: &ScriptBundle,
        narration: &NarrationTrack,
        out: &Path,
    ) -> ReelResult<PathBuf> {
        self.create_video_with_stats(bundle, narration, out)
            .map(|(path, _)| path)
    }

    #[tracing::instrument(skip_all, fields(title = %bundle.title, out = %out.display()))]
    pub fn create_video_with_stats(
        &mut self,
        bundle: &ScriptBundle,
        narration: &NarrationTrack,
        out: &Path,
    ) -> ReelResult<(PathBuf, RenderStats)> {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out, self.encode.clone()));
        let stats = self.render_into(bundle, narration, &mut sink, &mut rand::thread_rng())?;
        tracing::info!(
            segments = stats.segments,
            frames = stats.frames_total,
            procedural = stats.procedural_backgrounds,
            music = stats.music_layered,
            "video created"
        );
        Ok((out.to_path_buf(), stats))
    }

    /// Run every stage, streaming frames into `sink`.
    pub fn render_into<R: Rng + ?Sized>(
        &mut self,
        bundle: &ScriptBundle,
        narration: &NarrationTrack,
        sink: &mut dyn FrameSink,
        rng: &mut R,
    ) -> ReelResult<RenderStats> {
        let prepared = self.prepare(bundle, narration, rng)?;
        let mut stats = render_plan(&prepared.plan, sink, &self.threading)?;
        stats.music_layered = prepared.music_layered;
        Ok(stats)
    }

    /// Allocate, resolve, compose and mix without rendering.
    pub fn prepare<R: Rng + ?Sized>(
        &mut self,
        bundle: &ScriptBundle,
        narration: &NarrationTrack,
        rng: &mut R,
    ) -> ReelResult<PreparedVideo> {
        let duration = narration.duration_secs;
        let segments = allocate_segments(&bundle.script, duration)?;

        let assets = self
            .resolver
            .resolve(&bundle.topic, &self.mood, segments.len(), duration);

        let clips = compose_segments(
            &segments,
            &assets.images,
            &bundle.title,
            &self.settings,
            &self.style,
            self.painter.as_mut(),
            rng,
        )?;

        let music = assets.music_track.as_deref().filter(|_| self.settings.use_music);
        let mix = self.mixer.mix_files(&narration.path, duration, music)?;

        Ok(PreparedVideo {
            plan: RenderPlan {
                clips,
                audio: Some(mix.pcm),
                fps: self.settings.fps,
                resolution: self.settings.resolution,
            },
            segments,
            assets,
            music_layered: mix.music_layered,
        })
    }
}
