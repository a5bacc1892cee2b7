//! Per-segment visual effects: photo treatment, Ken-Burns zoom, procedural backgrounds and
//! premultiplied compositing.

pub mod blur;
pub mod color;
pub mod composite;
pub mod procedural;
pub mod zoom;

use std::path::Path;

use crate::assets::decode::load_image;
use crate::foundation::core::Resolution;
use crate::foundation::error::ReelResult;

pub const CONTRAST_FACTOR: f32 = 1.2;
pub const SATURATION_FACTOR: f32 = 0.9;
pub const BLUR_RADIUS: u32 = 2;
pub const BLUR_SIGMA: f32 = 1.0;

/// Contrast, desaturation and a light blur, in that order.
pub fn treat_photo(img: &mut image::RgbaImage) -> ReelResult<()> {
    color::adjust_contrast(img, CONTRAST_FACTOR);
    color::adjust_saturation(img, SATURATION_FACTOR);
    blur::blur_image_in_place(img, BLUR_RADIUS, BLUR_SIGMA)
}

/// Load a downloaded photo and turn it into a zoom source covering `resolution`.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn prepare_photo_background(path: &Path, resolution: Resolution) -> ReelResult<image::RgbaImage> {
    let mut img = load_image(path)?;
    treat_photo(&mut img)?;
    zoom::cover_resize(&img, resolution)
}
