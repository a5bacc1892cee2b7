use crate::foundation::error::{ReelError, ReelResult};

/// Position of a frame on the output timeline, counted from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Frames `[start, end)` of the output timeline covered by one clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl FrameRange {
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }
}

/// Output frame rate as the ratio `num / den`, as ffmpeg's `-r` takes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    pub num: u32,
    pub den: u32,
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if num == 0 || den == 0 {
            return Err(ReelError::validation(format!(
                "frame rate {num}/{den} must have a non-zero numerator and denominator"
            )));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second, as configured under `video.fps`.
    pub fn whole(per_sec: u32) -> ReelResult<Self> {
        Self::new(per_sec, 1)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        frames as f64 * f64::from(self.den) / f64::from(self.num)
    }

    /// Nearest frame boundary to `secs`; negative positions clamp to frame 0.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * f64::from(self.num) / f64::from(self.den))
            .round()
            .max(0.0) as u64
    }
}

/// Frame size in pixels. Reads and writes as `[width, height]` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes in one packed RGBA8 frame of this size.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl From<(u32, u32)> for Resolution {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl From<Resolution> for (u32, u32) {
    fn from(r: Resolution) -> Self {
        (r.width, r.height)
    }
}

/// One pixel with color channels already scaled by alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    /// Premultiply a config-style `[r, g, b, a]` color, rounding half up.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        Self {
            r: scale(r),
            g: scale(g),
            b: scale(b),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
