use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::http::HttpFetch;
use crate::assets::images::ImageResolver;
use crate::assets::music::MusicResolver;
use crate::config::Config;

/// Assets gathered for one video.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetSet {
    /// Background images in segment order; may be shorter than the segment count.
    pub images: Vec<PathBuf>,
    pub music_track: Option<PathBuf>,
}

impl AssetSet {
    /// Segments that will fall back to a generated background.
    pub fn procedural_count(&self, segments: usize) -> usize {
        segments.saturating_sub(self.images.len())
    }
}

/// Both acquisition chains behind one call. Never fails.
pub struct AssetResolver {
    pub images: ImageResolver,
    pub music: MusicResolver,
}

impl AssetResolver {
    pub fn new(images: ImageResolver, music: MusicResolver) -> Self {
        Self { images, music }
    }

    pub fn from_config(cfg: &Config, http: Arc<dyn HttpFetch>) -> Self {
        Self::new(
            ImageResolver::from_config(cfg, http.clone()),
            MusicResolver::from_config(cfg, http),
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn resolve(
        &self,
        topic: &str,
        mood: &str,
        segments: usize,
        narration_secs: f64,
    ) -> AssetSet {
        let images = self.images.resolve(topic, segments);
        let music_track = self.music.resolve(mood, narration_secs);
        AssetSet {
            images,
            music_track,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;
