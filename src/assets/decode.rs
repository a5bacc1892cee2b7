use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;

/// Decode an encoded image into opaque RGBA8.
///
/// Any source alpha is flattened onto black, so the result is valid both as straight and as
/// premultiplied RGBA.
pub fn decode_image(bytes: &[u8]) -> ReelResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::decode(format!("decode image from memory: {e}")))?;
    let mut rgba = dyn_img.to_rgba8();
    flatten_onto_black(rgba.as_mut());
    Ok(rgba)
}

/// Read and decode an image file. Unreadable or corrupt files are fatal decode errors.
pub fn load_image(path: &Path) -> ReelResult<image::RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| match e {
        ReelError::Decode(msg) => ReelError::decode(format!("{}: {msg}", path.display())),
        other => other,
    })
}

fn flatten_onto_black(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
