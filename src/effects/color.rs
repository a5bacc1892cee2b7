use crate::foundation::math::{clamp_u8, luma601};

/// Scale each channel's distance from the image's mean luminance by `factor`.
pub fn adjust_contrast(img: &mut image::RgbaImage, factor: f32) {
    let pixels = u64::from(img.width()) * u64::from(img.height());
    if pixels == 0 {
        return;
    }
    let total: f64 = img
        .pixels()
        .map(|p| f64::from(luma601(p[0], p[1], p[2])))
        .sum();
    let mean = (total / pixels as f64).round() as f32;

    for p in img.pixels_mut() {
        for c in 0..3 {
            p[c] = clamp_u8(mean + factor * (f32::from(p[c]) - mean));
        }
    }
}

/// Scale each pixel's chroma around its own luminance by `factor`. `0.0` is grayscale.
pub fn adjust_saturation(img: &mut image::RgbaImage, factor: f32) {
    for p in img.pixels_mut() {
        let l = luma601(p[0], p[1], p[2]).round();
        for c in 0..3 {
            p[c] = clamp_u8(l + factor * (f32::from(p[c]) - l));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
