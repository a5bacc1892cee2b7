use std::path::PathBuf;
use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;

use crate::caption::layout::{CaptionStyle, layout_caption};
use crate::caption::painter::GlyphPainter;
use crate::caption::raster::render_caption;
use crate::compose::clip::{BackgroundLayer, ComposedClip, OverlayLayer};
use crate::config::RenderSettings;
use crate::effects::prepare_photo_background;
use crate::effects::procedural::{pick_tone, procedural_background};
use crate::foundation::error::{ReelError, ReelResult};
use crate::script::segment::Segment;

/// Build exactly one clip per segment.
///
/// Segment `i` uses `images[i]` when present and a procedural background otherwise. The title is
/// drawn above the first segment's caption only. A corrupt image is a fatal decode error.
#[tracing::instrument(skip_all, fields(segments = segments.len(), images = images.len()))]
pub fn compose_segments<R: Rng + ?Sized>(
    segments: &[Segment],
    images: &[PathBuf],
    title: &str,
    settings: &RenderSettings,
    style: &CaptionStyle,
    painter: &mut dyn GlyphPainter,
    rng: &mut R,
) -> ReelResult<Vec<ComposedClip>> {
    if segments.is_empty() {
        return Err(ReelError::composition("no segments to compose"));
    }
    let res = settings.resolution;

    let photos: Vec<image::RgbaImage> = images
        .par_iter()
        .take(segments.len())
        .map(|path| prepare_photo_background(path, res))
        .collect::<ReelResult<Vec<_>>>()?;
    let mut photos = photos.into_iter();

    let overlay = OverlayLayer::black(settings.overlay_opacity);
    let title = Some(title.trim()).filter(|t| !t.is_empty());

    let mut clips = Vec::with_capacity(segments.len());
    for (i, seg) in segments.iter().enumerate() {
        let background = match photos.next() {
            Some(img) => BackgroundLayer::KenBurns(Arc::new(img)),
            None => {
                let tone = pick_tone(rng);
                tracing::debug!(segment = i, ?tone, "procedural background");
                BackgroundLayer::Procedural(Arc::new(procedural_background(res, tone)))
            }
        };

        let layout = layout_caption(
            painter,
            &seg.text,
            if i == 0 { title } else { None },
            res,
            style,
        )?;
        let caption = render_caption(painter, &layout, style, res)?.map(Arc::new);

        clips.push(ComposedClip {
            background,
            overlay,
            caption,
            resolution: res,
            duration: seg.duration,
        });
    }

    let procedural = clips.iter().filter(|c| c.is_static()).count();
    tracing::info!(clips = clips.len(), procedural, "composed segment clips");
    Ok(clips)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/pipeline.rs"]
mod tests;
