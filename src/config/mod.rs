//! Run configuration.
//!
//! A [`Config`] is read from a YAML file whose sections mirror the collaborator's settings
//! (`video`, `assets`, `channel`, `caption`, `encode`, `http`). Provider credentials never live
//! in the file; they come from the environment through [`ProviderCredentials::from_env`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{ReelError, ReelResult};

/// Vertical 9:16 frame used by the short-form preset.
pub const SHORT_RESOLUTION: Resolution = Resolution::new(1080, 1920);

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub video: VideoConfig,
    pub assets: AssetsConfig,
    pub channel: ChannelConfig,
    pub caption: CaptionConfig,
    pub encode: EncodeProfile,
    pub http: HttpConfig,
    #[serde(skip)]
    pub credentials: ProviderCredentials,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub resolution: Resolution,
    pub fps: u32,
    /// Alpha of the uniform legibility overlay drawn between background and caption.
    pub overlay_opacity: f32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::new(1920, 1080),
            fps: 24,
            overlay_opacity: 0.7,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub background_music: bool,
    pub music_volume: f32,
    pub image_cache_dir: PathBuf,
    pub music_cache_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            background_music: true,
            music_volume: 0.15,
            image_cache_dir: PathBuf::from("assets/images"),
            music_cache_dir: PathBuf::from("assets/music"),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Content niche; doubles as the music mood hint.
    pub niche: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            niche: "horror".to_string(),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Explicit font file. When unset, a list of common system fonts is probed.
    pub font_path: Option<PathBuf>,
    pub body_size_px: f32,
    pub title_size_px: f32,
    /// Minimum distance between any caption line and the left/right frame edge.
    pub margin_px: u32,
    pub wrap_width: usize,
    pub title_wrap_width: usize,
    pub outline_radius_px: i32,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    pub fill_rgba: [u8; 4],
    pub outline_rgba: [u8; 4],
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            body_size_px: 65.0,
            title_size_px: 90.0,
            margin_px: 150,
            wrap_width: 30,
            title_wrap_width: 25,
            outline_radius_px: 5,
            line_height: 1.25,
            fill_rgba: [255, 245, 245, 255],
            outline_rgba: [0, 0, 0, 255],
        }
    }
}

/// Fixed encoder settings passed to `ffmpeg`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncodeProfile {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub video_bitrate: String,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub threads: u32,
}

impl Default for EncodeProfile {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 20,
            video_bitrate: "3000k".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
            threads: 4,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub search_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            search_timeout_secs: 15,
            download_timeout_secs: 60,
        }
    }
}

impl HttpConfig {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

/// API keys for the external asset providers.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    pub pexels: Option<String>,
    pub pixabay: Option<String>,
    pub freesound: Option<String>,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("pexels", &self.pexels.is_some())
            .field("pixabay", &self.pixabay.is_some())
            .field("freesound", &self.freesound.is_some())
            .finish()
    }
}

impl ProviderCredentials {
    /// Read `PEXELS_API_KEY`, `PIXABAY_API_KEY` and `FREESOUND_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            pexels: non_empty_env("PEXELS_API_KEY"),
            pixabay: non_empty_env("PIXABAY_API_KEY"),
            freesound: non_empty_env("FREESOUND_API_KEY"),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The read-only view of the configuration consumed by the composition core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub resolution: Resolution,
    pub fps: Fps,
    pub overlay_opacity: f32,
    pub use_music: bool,
    pub music_volume: f32,
}

impl Config {
    /// Parse YAML text. Credentials are left empty.
    pub fn from_yaml_str(text: &str) -> ReelResult<Self> {
        let cfg: Config = serde_yaml::from_str(text)
            .map_err(|e| ReelError::config(format!("invalid config yaml: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a YAML config file and attach credentials from the environment.
    pub fn load(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_yaml_str(&text)?;
        cfg.credentials = ProviderCredentials::from_env();
        Ok(cfg)
    }

    /// Switch to the vertical short-form frame.
    pub fn as_short(mut self) -> Self {
        self.video.resolution = SHORT_RESOLUTION;
        self
    }

    pub fn with_credentials(mut self, credentials: ProviderCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn validate(&self) -> ReelResult<()> {
        let Resolution { width, height } = self.video.resolution;
        if width == 0 || height == 0 {
            return Err(ReelError::config("video.resolution must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::config(
                "video.resolution must be even (required for yuv420p output)",
            ));
        }
        if self.video.fps == 0 {
            return Err(ReelError::config("video.fps must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.video.overlay_opacity) {
            return Err(ReelError::config("video.overlay_opacity must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.assets.music_volume) {
            return Err(ReelError::config("assets.music_volume must be within [0, 1]"));
        }
        if self.caption.wrap_width == 0 || self.caption.title_wrap_width == 0 {
            return Err(ReelError::config("caption wrap widths must be > 0"));
        }
        if !(self.caption.body_size_px > 0.0 && self.caption.title_size_px > 0.0) {
            return Err(ReelError::config("caption font sizes must be > 0"));
        }
        if !(self.caption.line_height > 0.0) {
            return Err(ReelError::config("caption.line_height must be > 0"));
        }
        if self.caption.outline_radius_px < 0 {
            return Err(ReelError::config("caption.outline_radius_px must be >= 0"));
        }
        Ok(())
    }

    pub fn render_settings(&self) -> ReelResult<RenderSettings> {
        Ok(RenderSettings {
            resolution: self.video.resolution,
            fps: Fps::whole(self.video.fps)?,
            overlay_opacity: self.video.overlay_opacity,
            use_music: self.assets.background_music,
            music_volume: self.assets.music_volume,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/config.rs"]
mod tests;
