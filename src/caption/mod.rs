//! Outlined caption text: wrapping, placement, and rasterization into a tight layer.

pub mod layout;
pub mod painter;
pub mod raster;
pub mod wrap;

pub use layout::{CaptionLayout, CaptionLine, CaptionStyle, layout_caption};
pub use painter::{BoxGlyphPainter, GlyphPainter, VelloGlyphPainter};
pub use raster::{CaptionLayer, render_caption};
