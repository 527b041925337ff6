//! Interior color of the glass fill.
//!
//! Near the outline a striped band alternates between two edge hues along the
//! perimeter; toward the center the band fades into a single center hue. The
//! result feeds the displacement map, so its red/green channels double as the
//! refraction offsets.

use crate::color::Color;
use crate::errors::{GlassError, Result};
use crate::geometry::ShapeSample;
use crate::math::smoothstep;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlassPalette {
    pub edge_primary: Color,
    pub edge_secondary: Color,
    pub center: Color,
    /// Stripe repetitions around the full perimeter.
    pub pattern_frequency: f32,
    /// Angular offset of the stripes, in turns.
    pub pattern_phase: f32,
    /// Soften the outline over `[-2, 0.5]` instead of a hard cut.
    pub antialias: bool,
}

impl Default for GlassPalette {
    fn default() -> Self {
        Self {
            edge_primary: Color::rgb(0.9, 0.2, 0.2),
            edge_secondary: Color::rgb(0.2, 0.8, 0.2),
            center: Color::rgb(0.9, 0.8, 0.0),
            pattern_frequency: 3.0,
            pattern_phase: 0.0,
            antialias: true,
        }
    }
}

impl GlassPalette {
    pub fn validate(&self) -> Result<()> {
        if !self.pattern_frequency.is_finite() || !self.pattern_phase.is_finite() {
            return Err(GlassError::InvalidConfig(
                "pattern frequency and phase must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Stripe intensity at a perimeter angle, in `[0, 1]`.
    pub fn edge_pattern(&self, angle: f32) -> f32 {
        ((angle + self.pattern_phase) * TAU * self.pattern_frequency).sin() * 0.5 + 0.5
    }

    /// How far toward the center hue a sample sits, in `[0, 1]`.
    pub fn center_factor(distance: f32, radius: f32) -> f32 {
        // A square region has radius 0; fall back to a unit ramp.
        (-distance / radius.max(1.0)).clamp(0.0, 1.0)
    }

    pub fn coverage(&self, distance: f32) -> f32 {
        if self.antialias {
            1.0 - smoothstep(-2.0, 0.5, distance)
        } else {
            1.0
        }
    }

    /// Color of the fill at one sample; alpha is carried in the returned color.
    pub fn shade(&self, sample: &ShapeSample, radius: f32) -> Color {
        if sample.distance > 0.0 {
            return Color::TRANSPARENT;
        }
        let edge = self
            .edge_primary
            .lerp(&self.edge_secondary, self.edge_pattern(sample.angle));
        let color = edge.lerp(&self.center, Self::center_factor(sample.distance, radius));
        color.with_alpha(self.coverage(sample.distance))
    }
}
