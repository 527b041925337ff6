//! # Border Module
//!
//! Angle-windowed visibility of the glass rim.
//!
//! The rim is a thin band that grows *inward* from the outline. Which parts of
//! the perimeter show it is decided by a set of [`SegmentSpec`] windows over
//! the perimeter angle; overlapping windows combine by maximum so that an
//! overlap never brightens twice.

use crate::errors::{GlassError, Result};
use crate::geometry::ShapeSample;
use crate::math::smoothstep;
use serde::{Deserialize, Serialize};

/// Smallest fade width kept, so a fade never collapses into a division by zero.
pub const MIN_FADE: f32 = 1e-4;

/// A window over the perimeter angle where the border is visible.
///
/// `start > end` describes a window that wraps through angle 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSpec {
    pub start: f32,
    pub end: f32,
    pub fade_in_width: f32,
    pub fade_out_width: f32,
}

impl SegmentSpec {
    pub fn new(start: f32, end: f32, fade_in_width: f32, fade_out_width: f32) -> Self {
        Self {
            start,
            end,
            fade_in_width,
            fade_out_width,
        }
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// End of the window on an unrolled axis where it is always `>= start`.
    pub fn unrolled_end(&self) -> f32 {
        if self.wraps() {
            self.end + 1.0
        } else {
            self.end
        }
    }

    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.start) || !in_unit(self.end) {
            return Err(GlassError::InvalidConfig(format!(
                "segment bounds must lie in [0, 1], got {}..{}",
                self.start, self.end
            )));
        }
        if !(self.fade_in_width.is_finite() && self.fade_in_width >= 0.0)
            || !(self.fade_out_width.is_finite() && self.fade_out_width >= 0.0)
        {
            return Err(GlassError::InvalidConfig(format!(
                "segment fade widths must be non-negative, got {} / {}",
                self.fade_in_width, self.fade_out_width
            )));
        }
        Ok(())
    }

    /// Visibility of this window at perimeter angle `angle`, in `[0, 1]`.
    ///
    /// Fades in over `fade_in_width` after `start` and out over
    /// `fade_out_width` before `end`. Wrapping windows are evaluated on an
    /// unrolled axis so a fade may itself straddle angle 0.
    pub fn mask(&self, angle: f32) -> f32 {
        let end = self.unrolled_end();
        let t = if self.wraps() && angle < self.start {
            angle + 1.0
        } else {
            angle
        };
        if t < self.start || t > end {
            return 0.0;
        }
        let fade_in = smoothstep(self.start, self.start + self.fade_in_width.max(MIN_FADE), t);
        let fade_out = smoothstep(end, end - self.fade_out_width.max(MIN_FADE), t);
        fade_in * fade_out
    }
}

/// Rim geometry and the segments that show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderStyle {
    /// Depth of the rim measured inward from the outline.
    pub thickness: f32,
    pub segments: Vec<SegmentSpec>,
    /// Peak alpha; kept below 1 so the rim never clips to pure white.
    pub opacity: f32,
    /// Segment visibility below this is treated as none.
    pub noise_floor: f32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            thickness: 3.0,
            segments: vec![
                // Right edge, over the top, down to the left: wraps through 0.
                SegmentSpec::new(0.975, 0.465, 0.024, 0.045),
                // A short arc just below the left edge.
                SegmentSpec::new(0.490, 0.585, 0.035, 0.035),
            ],
            opacity: 0.9,
            noise_floor: 0.01,
        }
    }
}

impl BorderStyle {
    pub fn validate(&self) -> Result<()> {
        if !(self.thickness.is_finite() && self.thickness > 0.0) {
            return Err(GlassError::InvalidConfig(format!(
                "border thickness must be positive, got {}",
                self.thickness
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(GlassError::InvalidConfig(format!(
                "border opacity must lie in [0, 1], got {}",
                self.opacity
            )));
        }
        self.segments.iter().try_for_each(SegmentSpec::validate)
    }

    /// Union of all segment windows at `angle`.
    pub fn segment_mask(&self, angle: f32) -> f32 {
        self.segments
            .iter()
            .map(|s| s.mask(angle))
            .fold(0.0, f32::max)
    }

    /// The thin band hugging the inner side of the outline, ignoring segments.
    pub fn band(&self, distance: f32) -> f32 {
        smoothstep(-self.thickness, -self.thickness + 2.0, distance)
            * smoothstep(1.0, -1.0, distance)
    }

    /// Final border alpha for one shape sample, in `[0, 1]`.
    pub fn alpha(&self, sample: &ShapeSample) -> f32 {
        let d = sample.distance;
        if d < -self.thickness || d >= 0.0 {
            return 0.0;
        }
        let segment = self.segment_mask(sample.angle);
        if segment < self.noise_floor {
            return 0.0;
        }
        (self.band(d) * segment * self.opacity).clamp(0.0, 1.0)
    }
}
