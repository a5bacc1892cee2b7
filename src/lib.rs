//! nightreel assembles narrated, captioned videos.
//!
//! A [`VideoPipeline`] takes a [`ScriptBundle`] and a [`NarrationTrack`] and:
//!
//! - splits the narration into timed segments whose durations sum to the audio length
//! - fetches background images and a music bed through provider fallback chains
//! - composes one clip per segment (Ken-Burns photo or generated background, overlay, caption)
//! - mixes narration with the music bed and encodes everything through `ffmpeg`
#![forbid(unsafe_code)]

pub mod assets;
pub mod audio;
pub mod caption;
pub mod compose;
pub mod config;
pub mod effects;
pub mod encode;
pub(crate) mod foundation;
pub mod pipeline;
pub mod render;
pub mod script;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, Resolution, Rgba8Premul};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::media::{AudioPcm, is_ffmpeg_on_path};
pub use crate::assets::{AssetResolver, AssetSet};
pub use crate::audio::{AudioMixer, MixOutcome};
pub use crate::caption::{BoxGlyphPainter, CaptionStyle, GlyphPainter, VelloGlyphPainter};
pub use crate::compose::{ComposedClip, compose_segments};
pub use crate::config::{Config, ProviderCredentials, RenderSettings};
pub use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{PreparedVideo, VideoPipeline};
pub use crate::render::{FrameRGBA, RenderPlan, RenderStats, RenderThreading, render_plan};
pub use crate::script::bundle::{NarrationTrack, ScriptBundle};
pub use crate::script::segment::{Segment, allocate_segments};
