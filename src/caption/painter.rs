use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::core::Rgba8Premul;

/// Bold sans fonts probed when no font file is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Impact.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Draws single caption lines onto a transparent canvas.
///
/// Coordinates are canvas pixels; `(x, y)` is the top-left of the line box.
pub trait GlyphPainter {
    /// Advance width of `text` at `size_px`.
    fn measure(&mut self, text: &str, size_px: f32) -> ReelResult<f32>;

    /// Start a fresh transparent `width x height` canvas.
    fn begin(&mut self, width: u32, height: u32) -> ReelResult<()>;

    fn fill_line(&mut self, text: &str, size_px: f32, x: f32, y: f32, rgba: [u8; 4])
    -> ReelResult<()>;

    /// Stamp `text` at every offset of the `(2r+1)^2` neighbourhood in `outline`, then fill it.
    fn fill_outlined_line(
        &mut self,
        text: &str,
        size_px: f32,
        x: f32,
        y: f32,
        radius: i32,
        outline: [u8; 4],
        fill: [u8; 4],
    ) -> ReelResult<()> {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                self.fill_line(text, size_px, x + dx as f32, y + dy as f32, outline)?;
            }
        }
        self.fill_line(text, size_px, x, y, fill)
    }

    /// Premultiplied RGBA8 contents of the canvas.
    fn finish(&mut self) -> ReelResult<Vec<u8>>;
}

/// The first usable font: `configured` if set, else the first existing system candidate.
pub fn discover_font(configured: Option<&Path>) -> ReelResult<PathBuf> {
    if let Some(p) = configured {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
        return Err(ReelError::composition(format!(
            "configured caption font '{}' does not exist",
            p.display()
        )));
    }
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            ReelError::composition("no caption font found; set caption.font_path in the config")
        })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    fn new(font_bytes: &[u8]) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::composition("no font families registered from caption font")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::composition("caption font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    fn layout_line(&mut self, text: &str, size_px: f32) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "caption size_px must be finite and > 0",
            ));
        }
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::default()));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Shapes with parley and rasterizes with `vello_cpu`.
pub struct VelloGlyphPainter {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    ctx: Option<vello_cpu::RenderContext>,
}

impl VelloGlyphPainter {
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> ReelResult<Self> {
        let engine = TextLayoutEngine::new(&font_bytes)?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            engine,
            font,
            ctx: None,
        })
    }

    pub fn from_font_file(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::composition(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_font_bytes(bytes)
    }

    fn draw_layout(
        ctx: &mut vello_cpu::RenderContext,
        font: &vello_cpu::peniko::FontData,
        layout: &parley::Layout<TextBrushRgba8>,
        x: f32,
        y: f32,
        rgba: [u8; 4],
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((f64::from(x), f64::from(y))));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn ctx_mut(&mut self) -> ReelResult<&mut vello_cpu::RenderContext> {
        self.ctx
            .as_mut()
            .ok_or_else(|| ReelError::composition("glyph painter used before begin()"))
    }
}

impl GlyphPainter for VelloGlyphPainter {
    fn measure(&mut self, text: &str, size_px: f32) -> ReelResult<f32> {
        Ok(self.engine.layout_line(text, size_px)?.width())
    }

    fn begin(&mut self, width: u32, height: u32) -> ReelResult<()> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ReelError::composition(format!("caption width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ReelError::composition(format!("caption height {height} exceeds u16")))?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        self.ctx = Some(ctx);
        Ok(())
    }

    fn fill_line(
        &mut self,
        text: &str,
        size_px: f32,
        x: f32,
        y: f32,
        rgba: [u8; 4],
    ) -> ReelResult<()> {
        let layout = self.engine.layout_line(text, size_px)?;
        let font = self.font.clone();
        Self::draw_layout(self.ctx_mut()?, &font, &layout, x, y, rgba);
        Ok(())
    }

    fn fill_outlined_line(
        &mut self,
        text: &str,
        size_px: f32,
        x: f32,
        y: f32,
        radius: i32,
        outline: [u8; 4],
        fill: [u8; 4],
    ) -> ReelResult<()> {
        let layout = self.engine.layout_line(text, size_px)?;
        let font = self.font.clone();
        let ctx = self.ctx_mut()?;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                Self::draw_layout(ctx, &font, &layout, x + dx as f32, y + dy as f32, outline);
            }
        }
        Self::draw_layout(ctx, &font, &layout, x, y, fill);
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        let ctx = self.ctx_mut()?;
        let mut pixmap = vello_cpu::Pixmap::new(ctx.width(), ctx.height());
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

/// Font-free painter drawing each non-space char as a solid `0.5em x 1em` box.
///
/// Deterministic metrics make it suitable for previews and tests on machines without fonts.
#[derive(Debug, Default)]
pub struct BoxGlyphPainter {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BoxGlyphPainter {
    pub const ADVANCE_EM: f32 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, rgba: [u8; 4]) {
        let cx0 = x0.round().max(0.0) as u32;
        let cy0 = y0.round().max(0.0) as u32;
        let cx1 = (x1.round().max(0.0) as u32).min(self.width);
        let cy1 = (y1.round().max(0.0) as u32).min(self.height);
        let src = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]).to_array();
        for y in cy0..cy1 {
            for x in cx0..cx1 {
                let i = (y as usize * self.width as usize + x as usize) * 4;
                let d = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
                let out = crate::effects::composite::over(d, src, 1.0);
                self.data[i..i + 4].copy_from_slice(&out);
            }
        }
    }
}

impl GlyphPainter for BoxGlyphPainter {
    fn measure(&mut self, text: &str, size_px: f32) -> ReelResult<f32> {
        Ok(text.chars().count() as f32 * size_px * Self::ADVANCE_EM)
    }

    fn begin(&mut self, width: u32, height: u32) -> ReelResult<()> {
        self.width = width;
        self.height = height;
        self.data = vec![0u8; width as usize * height as usize * 4];
        Ok(())
    }

    fn fill_line(
        &mut self,
        text: &str,
        size_px: f32,
        x: f32,
        y: f32,
        rgba: [u8; 4],
    ) -> ReelResult<()> {
        let advance = size_px * Self::ADVANCE_EM;
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let gx = x + i as f32 * advance;
            self.fill_rect(gx, y, gx + advance, y + size_px, rgba);
        }
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<Vec<u8>> {
        Ok(std::mem::take(&mut self.data))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/painter.rs"]
mod tests;
