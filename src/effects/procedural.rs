//! Dark generated backgrounds used when no photo is available.

use rand::Rng;
use rand::seq::SliceRandom as _;
use rayon::prelude::*;

use crate::foundation::core::Resolution;
use crate::foundation::math::mul_div255_u8;
use crate::render::frame::FrameRGBA;

pub const PALETTE: [[u8; 3]; 6] = [
    [10, 10, 15],
    [15, 5, 5],
    [5, 0, 15],
    [0, 10, 0],
    [20, 0, 0],
    [0, 0, 0],
];

/// Alpha of the darkening gradient at the bottom row.
pub const GRADIENT_MAX_ALPHA: f32 = 80.0;
pub const VIGNETTE_RINGS: u32 = 100;
/// Alpha of the outermost vignette ring.
pub const VIGNETTE_MAX_ALPHA: f32 = 150.0;

pub fn pick_tone<R: Rng + ?Sized>(rng: &mut R) -> [u8; 3] {
    PALETTE.choose(rng).copied().unwrap_or([0, 0, 0])
}

/// Alpha of the vignette ring containing `(x, y)`: 0 at the centre, growing in quantized
/// elliptical rings to [`VIGNETTE_MAX_ALPHA`] at the frame edge and beyond.
pub fn vignette_alpha(res: Resolution, x: u32, y: u32) -> u8 {
    let (cx, cy) = (res.width as f32 * 0.5, res.height as f32 * 0.5);
    let dx = (x as f32 + 0.5 - cx) / cx;
    let dy = (y as f32 + 0.5 - cy) / cy;
    let d = (dx * dx + dy * dy).sqrt().min(1.0);
    let ring = ((d * VIGNETTE_RINGS as f32) as u32).min(VIGNETTE_RINGS);
    (VIGNETTE_MAX_ALPHA * ring as f32 / VIGNETTE_RINGS as f32).round() as u8
}

pub fn gradient_alpha(res: Resolution, y: u32) -> u8 {
    (GRADIENT_MAX_ALPHA * y as f32 / res.height.max(1) as f32).round() as u8
}

/// Solid tone, then a top-to-bottom black gradient, then the vignette.
pub fn procedural_background(res: Resolution, tone: [u8; 3]) -> FrameRGBA {
    let mut frame = FrameRGBA::solid(res, tone);
    let row_len = res.width as usize * 4;
    if row_len == 0 {
        return frame;
    }
    frame
        .data
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let keep_gradient = 255 - u16::from(gradient_alpha(res, y as u32));
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let keep = mul_div255_u8(
                    keep_gradient,
                    255 - u16::from(vignette_alpha(res, x as u32, y as u32)),
                );
                for c in px.iter_mut().take(3) {
                    *c = mul_div255_u8(u16::from(*c), u16::from(keep));
                }
            }
        });
    frame
}

#[cfg(test)]
#[path = "../../tests/unit/effects/procedural.rs"]
mod tests;
