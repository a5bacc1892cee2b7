use crate::caption::layout::{CaptionLayout, CaptionStyle};
use crate::caption::painter::GlyphPainter;
use crate::foundation::core::Resolution;
use crate::foundation::error::ReelResult;

/// A rendered caption: premultiplied RGBA8 covering only the text block, positioned in the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionLayer {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Rasterize `layout` once: per line, the outline neighbourhood then the fill.
///
/// Returns `None` for an empty layout.
pub fn render_caption(
    painter: &mut dyn GlyphPainter,
    layout: &CaptionLayout,
    style: &CaptionStyle,
    res: Resolution,
) -> ReelResult<Option<CaptionLayer>> {
    if layout.is_empty() {
        return Ok(None);
    }
    let r = style.outline_radius_px.max(0) as f32;

    let mut x0 = f32::INFINITY;
    let mut y0 = f32::INFINITY;
    let mut x1 = f32::NEG_INFINITY;
    let mut y1 = f32::NEG_INFINITY;
    for line in &layout.lines {
        x0 = x0.min(line.x - r);
        y0 = y0.min(line.top - r);
        x1 = x1.max(line.right() + r);
        y1 = y1.max(line.top + line.size_px * style.line_height.max(1.0) + r);
    }

    let left = (x0.floor() as i32).max(0);
    let top = (y0.floor() as i32).max(0);
    let right = (x1.ceil() as i32).min(res.width as i32);
    let bottom = (y1.ceil() as i32).min(res.height as i32);
    if right <= left || bottom <= top {
        return Ok(None);
    }
    let width = (right - left) as u32;
    let height = (bottom - top) as u32;

    painter.begin(width, height)?;
    for line in &layout.lines {
        painter.fill_outlined_line(
            &line.text,
            line.size_px,
            line.x - left as f32,
            line.top - top as f32,
            style.outline_radius_px.max(0),
            style.outline_rgba,
            style.fill_rgba,
        )?;
    }
    let data = painter.finish()?;

    Ok(Some(CaptionLayer {
        x: left,
        y: top,
        width,
        height,
        data,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/caption/raster.rs"]
mod tests;
