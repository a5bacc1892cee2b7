//! Ken-Burns zoom: a pure function of (source frame, normalized progress).

use image::imageops::{self, FilterType};
use rayon::prelude::*;

use crate::foundation::core::Resolution;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;

/// Extra scale reached at the end of a segment.
pub const ZOOM_RANGE: f32 = 0.1;

/// `1 + 0.1 * p` with `p` clamped to `[0, 1]`; non-finite progress counts as 0.
pub fn zoom_scale(progress: f32) -> f32 {
    let p = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    1.0 + ZOOM_RANGE * p
}

/// Resize preserving aspect ratio so the image covers `target`, then centre-crop to it.
pub fn cover_resize(img: &image::RgbaImage, target: Resolution) -> ReelResult<image::RgbaImage> {
    let (sw, sh) = img.dimensions();
    if sw == 0 || sh == 0 {
        return Err(ReelError::decode("cannot resize an empty image"));
    }
    let (tw, th) = (target.width, target.height);
    let scale = (f64::from(tw) / f64::from(sw)).max(f64::from(th) / f64::from(sh));
    let nw = ((f64::from(sw) * scale).round() as u32).max(tw);
    let nh = ((f64::from(sh) * scale).round() as u32).max(th);

    let resized = if (nw, nh) == (sw, sh) {
        img.clone()
    } else {
        imageops::resize(img, nw, nh, FilterType::Lanczos3)
    };
    let x = (nw - tw) / 2;
    let y = (nh - th) / 2;
    Ok(imageops::crop_imm(&resized, x, y, tw, th).to_image())
}

/// Render the zoomed view of `src` at `progress`: the centred crop of size `(W/z, H/z)` scaled
/// back to the full frame with bilinear sampling.
pub fn zoom_frame(src: &image::RgbaImage, progress: f32) -> FrameRGBA {
    let (w, h) = src.dimensions();
    let z = zoom_scale(progress);
    let mut data = vec![0u8; w as usize * h as usize * 4];
    if w == 0 || h == 0 {
        return FrameRGBA {
            width: w,
            height: h,
            data,
            premultiplied: true,
        };
    }

    let raw = src.as_raw();
    let (cx, cy) = (w as f32 * 0.5, h as f32 * 0.5);
    let row_len = w as usize * 4;
    data.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = cy + (y as f32 + 0.5 - cy) / z - 0.5;
            for x in 0..w as usize {
                let sx = cx + (x as f32 + 0.5 - cx) / z - 0.5;
                let px = sample_bilinear(raw, w, h, sx, sy);
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });

    FrameRGBA {
        width: w,
        height: h,
        data,
        premultiplied: true,
    }
}

fn sample_bilinear(raw: &[u8], w: u32, h: u32, sx: f32, sy: f32) -> [u8; 4] {
    let max_x = (w - 1) as f32;
    let max_y = (h - 1) as f32;
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let x0 = x0 as usize;
    let y0 = y0 as usize;
    let x1 = (x0 + 1).min(w as usize - 1);
    let y1 = (y0 + 1).min(h as usize - 1);

    let at = |x: usize, y: usize, c: usize| f32::from(raw[(y * w as usize + x) * 4 + c]);
    let mut out = [0u8; 4];
    for (c, o) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *o = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/zoom.rs"]
mod tests;
