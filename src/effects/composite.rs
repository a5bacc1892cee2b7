use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::frame::FrameRGBA;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels, with the source scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Blend one uniform color over every pixel; the legibility overlay.
pub fn fill_over_in_place(dst: &mut [u8], color: PremulRgba8, opacity: f32) -> ReelResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(ReelError::composition(
            "fill_over_in_place expects an rgba8 buffer",
        ));
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], color, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a `w x h` premultiplied layer at `(x, y)`, clipping to the frame.
pub fn blit_over(
    dst: &mut FrameRGBA,
    layer: &[u8],
    x: i32,
    y: i32,
    w: u32,
    h: u32,
) -> ReelResult<()> {
    if layer.len() != w as usize * h as usize * 4 {
        return Err(ReelError::composition(
            "blit_over expects a layer matching w*h*4",
        ));
    }
    let fw = dst.width as i32;
    let fh = dst.height as i32;
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w as i32).min(fw);
    let y1 = (y + h as i32).min(fh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for fy in y0..y1 {
        let ly = (fy - y) as usize;
        for fx in x0..x1 {
            let lx = (fx - x) as usize;
            let li = (ly * w as usize + lx) * 4;
            let src = [layer[li], layer[li + 1], layer[li + 2], layer[li + 3]];
            if src[3] == 0 {
                continue;
            }
            let di = (fy as usize * dst.width as usize + fx as usize) * 4;
            let d = &mut dst.data[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], src, 1.0);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
