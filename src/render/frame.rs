use crate::foundation::core::Resolution;
use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// CPU frame in RGBA8 format.
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Opaque frame filled with one color.
    pub fn solid(resolution: Resolution, rgb: [u8; 3]) -> Self {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        Self {
            width: resolution.width,
            height: resolution.height,
            data: px.repeat(resolution.rgba8_len() / 4),
            premultiplied: true,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn ensure_resolution(&self, expected: Resolution) -> ReelResult<()> {
        if self.resolution() != expected || self.data.len() != expected.rgba8_len() {
            return Err(ReelError::composition(format!(
                "frame is {}x{} ({} bytes), expected {}x{}",
                self.width,
                self.height,
                self.data.len(),
                expected.width,
                expected.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
