use crate::foundation::error::{CaptionFxError, CaptionFxResult};

pub use kurbo::{Affine, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> CaptionFxResult<Self> {
        if start.0 > end.0 {
            return Err(CaptionFxError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> CaptionFxResult<Self> {
        if den == 0 {
            return Err(CaptionFxError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(CaptionFxError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Playback time of `frame` in milliseconds: `frame / fps * 1000`.
    pub fn frame_to_ms(self, frame: u64) -> f64 {
        (frame as f64) * 1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    pub fn ms_to_frames_floor(self, ms: f64) -> u64 {
        if !ms.is_finite() {
            return if ms > 0.0 { u64::MAX } else { 0 };
        }
        (ms * f64::from(self.num) / (1000.0 * f64::from(self.den)))
            .floor()
            .max(0.0) as u64
    }
}

/// Output resolution. All caption geometry is expressed relative to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> CaptionFxResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> CaptionFxResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptionFxError::validation("canvas width/height must be > 0"));
        }
        Ok(())
    }

    /// Reference length for responsive sizing: `min(width, height)`.
    pub fn base_px(self) -> f64 {
        f64::from(self.width.min(self.height))
    }

    pub fn of_base(self, frac: f64) -> f64 {
        self.base_px() * frac
    }

    pub fn of_width(self, frac: f64) -> f64 {
        f64::from(self.width) * frac
    }

    pub fn of_height(self, frac: f64) -> f64 {
        f64::from(self.height) * frac
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
