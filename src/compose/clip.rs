use std::sync::Arc;

use crate::caption::raster::CaptionLayer;
use crate::effects::composite::{PremulRgba8, blit_over, fill_over_in_place};
use crate::effects::zoom::zoom_frame;
use crate::foundation::core::Resolution;
use crate::foundation::error::ReelResult;
use crate::render::frame::FrameRGBA;

#[derive(Clone, Debug)]
pub enum BackgroundLayer {
    /// Treated, cover-resized photo; zoomed per frame.
    KenBurns(Arc<image::RgbaImage>),
    /// Pre-rendered generated background; identical on every frame.
    Procedural(Arc<FrameRGBA>),
}

impl BackgroundLayer {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Procedural(_))
    }

    fn frame_at(&self, progress: f32) -> FrameRGBA {
        match self {
            Self::KenBurns(img) => zoom_frame(img, progress),
            Self::Procedural(frame) => frame.as_ref().clone(),
        }
    }
}

/// Uniform full-frame legibility layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayLayer {
    pub color: PremulRgba8,
    pub opacity: f32,
}

impl OverlayLayer {
    pub fn black(opacity: f32) -> Self {
        Self {
            color: [0, 0, 0, 255],
            opacity,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ComposedClip {
    pub background: BackgroundLayer,
    pub overlay: OverlayLayer,
    pub caption: Option<Arc<CaptionLayer>>,
    pub resolution: Resolution,
    /// Seconds; equal to the segment's duration.
    pub duration: f64,
}

impl ComposedClip {
    /// Whether every frame of the clip is identical.
    pub fn is_static(&self) -> bool {
        self.background.is_static()
    }

    /// Background, then overlay, then caption at normalized `progress`.
    pub fn render_frame(&self, progress: f32) -> ReelResult<FrameRGBA> {
        let mut frame = self.background.frame_at(progress);
        frame.ensure_resolution(self.resolution)?;
        fill_over_in_place(&mut frame.data, self.overlay.color, self.overlay.opacity)?;
        if let Some(caption) = &self.caption {
            blit_over(
                &mut frame,
                &caption.data,
                caption.x,
                caption.y,
                caption.width,
                caption.height,
            )?;
        }
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/clip.rs"]
mod tests;
