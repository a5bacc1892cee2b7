//! Caption placement.
//!
//! Every line is horizontally centred, then clamped so that
//! `margin <= x` and `x + width <= W - margin`. Lines wider than the text column shrink the
//! whole caption until they fit.

use crate::caption::painter::GlyphPainter;
use crate::caption::wrap::wrap_text;
use crate::config::CaptionConfig;
use crate::foundation::core::Resolution;
use crate::foundation::error::{ReelError, ReelResult};

/// Smallest font size a caption may shrink to before composition gives up.
pub const MIN_FONT_PX: f32 = 4.0;
const MAX_FIT_PASSES: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionStyle {
    pub body_size_px: f32,
    pub title_size_px: f32,
    pub margin_px: f32,
    pub wrap_width: usize,
    pub title_wrap_width: usize,
    pub line_height: f32,
    pub outline_radius_px: i32,
    pub fill_rgba: [u8; 4],
    pub outline_rgba: [u8; 4],
}

impl From<&CaptionConfig> for CaptionStyle {
    fn from(cfg: &CaptionConfig) -> Self {
        Self {
            body_size_px: cfg.body_size_px,
            title_size_px: cfg.title_size_px,
            margin_px: cfg.margin_px as f32,
            wrap_width: cfg.wrap_width,
            title_wrap_width: cfg.title_wrap_width,
            line_height: cfg.line_height,
            outline_radius_px: cfg.outline_radius_px,
            fill_rgba: cfg.fill_rgba,
            outline_rgba: cfg.outline_rgba,
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::from(&CaptionConfig::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLine {
    pub text: String,
    pub size_px: f32,
    /// Left edge in frame pixels.
    pub x: f32,
    /// Top of the line box in frame pixels.
    pub top: f32,
    pub width: f32,
    pub is_title: bool,
}

impl CaptionLine {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptionLayout {
    pub lines: Vec<CaptionLine>,
    /// Height of the whole block, gaps included.
    pub block_height: f32,
    /// Applied shrink factor; `1.0` when the configured sizes fit.
    pub scale: f32,
}

impl CaptionLayout {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct Piece {
    text: String,
    base_size: f32,
    is_title: bool,
}

/// Wrap and place `text` (and `title`, when given) for a `res` frame.
pub fn layout_caption(
    painter: &mut dyn GlyphPainter,
    text: &str,
    title: Option<&str>,
    res: Resolution,
    style: &CaptionStyle,
) -> ReelResult<CaptionLayout> {
    let title_lines = title
        .map(|t| wrap_text(t, style.title_wrap_width))
        .unwrap_or_default();
    let body_lines = wrap_text(text, style.wrap_width);

    let mut pieces: Vec<Piece> = title_lines
        .into_iter()
        .map(|text| Piece {
            text,
            base_size: style.title_size_px,
            is_title: true,
        })
        .collect();
    let has_title = !pieces.is_empty();
    pieces.extend(body_lines.into_iter().map(|text| Piece {
        text,
        base_size: style.body_size_px,
        is_title: false,
    }));
    if pieces.is_empty() {
        return Ok(CaptionLayout {
            scale: 1.0,
            ..CaptionLayout::default()
        });
    }

    let frame_w = res.width as f32;
    let frame_h = res.height as f32;
    let column = frame_w - 2.0 * style.margin_px;
    if column <= 0.0 {
        return Err(ReelError::validation(format!(
            "caption margin {} leaves no room in a {}px wide frame",
            style.margin_px, res.width
        )));
    }

    let gap_lines = usize::from(has_title && pieces.iter().any(|p| !p.is_title));
    let block_height_at = |scale: f32| -> f32 {
        let lines: f32 = pieces
            .iter()
            .map(|p| p.base_size * scale * style.line_height)
            .sum();
        lines + gap_lines as f32 * style.body_size_px * scale * style.line_height
    };

    let mut scale = 1.0f32;
    let mut widths = Vec::with_capacity(pieces.len());
    let mut fits = false;
    for _ in 0..MAX_FIT_PASSES {
        widths.clear();
        for p in &pieces {
            widths.push(painter.measure(&p.text, p.base_size * scale)?);
        }
        let widest = widths.iter().copied().fold(0.0f32, f32::max);
        let tallest = block_height_at(scale);

        let shrink = (column / widest.max(f32::EPSILON))
            .min(frame_h / tallest.max(f32::EPSILON))
            .min(1.0);
        if shrink >= 1.0 {
            fits = true;
            break;
        }
        scale *= shrink * 0.99;
        let smallest = pieces
            .iter()
            .map(|p| p.base_size * scale)
            .fold(f32::INFINITY, f32::min);
        if smallest < MIN_FONT_PX {
            break;
        }
    }
    if !fits {
        return Err(ReelError::validation(format!(
            "caption does not fit a {}x{} frame with {}px margins",
            res.width, res.height, style.margin_px
        )));
    }
    if scale < 1.0 {
        tracing::debug!(scale, "caption shrunk to fit the frame");
    }

    let block_height = block_height_at(scale);
    let mut cursor = (frame_h - block_height) * 0.5;
    let mut lines = Vec::with_capacity(pieces.len());
    let mut prev_was_title = false;
    for (p, width) in pieces.into_iter().zip(widths) {
        if prev_was_title && !p.is_title {
            cursor += style.body_size_px * scale * style.line_height;
        }
        let size_px = p.base_size * scale;

        let mut x = (frame_w - width) * 0.5;
        if x < style.margin_px {
            x = style.margin_px;
        }
        if x + width > frame_w - style.margin_px {
            x = style.margin_px;
        }

        lines.push(CaptionLine {
            text: p.text,
            size_px,
            x,
            top: cursor,
            width,
            is_title: p.is_title,
        });
        cursor += size_px * style.line_height;
        prev_was_title = p.is_title;
    }

    Ok(CaptionLayout {
        lines,
        block_height,
        scale,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/caption/layout.rs"]
mod tests;
