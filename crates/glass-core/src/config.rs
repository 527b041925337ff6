//! # Config Module
//!
//! Every tunable of the glass effect, with defaults that reproduce the
//! reference look. Deserializes from JSON with any field omitted.
//!
//! The glass and rim graphs each own their [`GraphParams`]; in particular
//! blur is configured per graph. The frosted interior and the crisp rim
//! differ only by that sigma, so it must never be a shared value.

use crate::border::BorderStyle;
use crate::color::Color;
use crate::errors::{GlassError, Result};
use crate::geometry::{CornerRadii, ShapeKind};
use crate::layer::{BlendMode, TileMode};
use crate::palette::GlassPalette;
use serde::{Deserialize, Serialize};

/// Post-processing applied by one filter graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    /// Refraction strength of the displacement map, in pixels.
    pub displacement_scale: f32,
    /// Gaussian sigma of the outer blur. Zero disables blurring.
    pub blur_sigma: f32,
    #[serde(default)]
    pub tile_mode: TileMode,
}

impl GraphParams {
    pub fn glass() -> Self {
        Self {
            displacement_scale: 40.0,
            blur_sigma: 8.0,
            tile_mode: TileMode::Clamp,
        }
    }

    pub fn rim() -> Self {
        Self {
            displacement_scale: 15.0,
            blur_sigma: 0.0,
            tile_mode: TileMode::Clamp,
        }
    }

    fn validate(&self, which: &str) -> Result<()> {
        if !self.displacement_scale.is_finite() {
            return Err(GlassError::InvalidConfig(format!(
                "{} displacement scale must be finite",
                which
            )));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma >= 0.0) {
            return Err(GlassError::InvalidConfig(format!(
                "{} blur sigma must be non-negative, got {}",
                which, self.blur_sigma
            )));
        }
        Ok(())
    }
}

/// A diagonal light running from the region's top-left to its bottom-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightGradient {
    pub colors: Vec<Color>,
    /// Stop offsets in `[0, 1]`; evenly spaced when absent.
    #[serde(default)]
    pub positions: Option<Vec<f32>>,
}

impl LightGradient {
    /// Warm falloff used over the interior when enabled.
    pub fn interior() -> Self {
        Self {
            colors: vec![
                Color::from_rgba8(255, 255, 255, 0.49),
                Color::from_rgba8(255, 0, 0, 0.05),
                Color::from_rgba8(179, 1, 1, 0.0),
            ],
            positions: None,
        }
    }

    /// Bright white corner fading across the rim.
    pub fn rim() -> Self {
        Self {
            colors: [1.0, 0.4, 0.2, 0.1, 0.05]
                .into_iter()
                .map(|a| Color::WHITE.with_alpha(a))
                .collect(),
            positions: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.colors.len() < 2 {
            return Err(GlassError::InvalidConfig(
                "light gradient needs at least two colors".into(),
            ));
        }
        if let Some(pos) = &self.positions {
            if pos.len() != self.colors.len() {
                return Err(GlassError::InvalidConfig(format!(
                    "light gradient has {} colors but {} positions",
                    self.colors.len(),
                    pos.len()
                )));
            }
            if pos.windows(2).any(|w| w[0] > w[1]) || pos.iter().any(|p| !(0.0..=1.0).contains(p))
            {
                return Err(GlassError::InvalidConfig(
                    "light gradient positions must be ascending within [0, 1]".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlassConfig {
    pub shape: ShapeKind,
    /// Per-corner override of the region's uniform radius.
    pub corner_radii: Option<CornerRadii>,
    pub palette: GlassPalette,
    pub border: BorderStyle,
    /// Interior graph: strong refraction, frosted blur.
    pub glass: GraphParams,
    /// Optional light screened over the interior tint.
    pub glass_light: Option<LightGradient>,
    /// Rim graph: gentle refraction, no blur.
    pub rim: GraphParams,
    pub rim_tint: Color,
    pub rim_light: LightGradient,
    /// How the lit tint combines with the refracted rim.
    pub rim_blend: BlendMode,
    /// Extra room around the region for the rim's clip, on every side.
    pub overscan: f32,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::RoundedRect,
            corner_radii: None,
            palette: GlassPalette::default(),
            border: BorderStyle::default(),
            glass: GraphParams::glass(),
            glass_light: None,
            rim: GraphParams::rim(),
            rim_tint: Color::from_rgba8(251, 251, 251, 0.97),
            rim_light: LightGradient::rim(),
            rim_blend: BlendMode::Screen,
            overscan: 15.0,
        }
    }
}

impl GlassConfig {
    pub fn validate(&self) -> Result<()> {
        self.palette.validate()?;
        self.border.validate()?;
        self.glass.validate("glass")?;
        self.rim.validate("rim")?;
        if let Some(light) = &self.glass_light {
            light.validate()?;
        }
        self.rim_light.validate()?;
        if !(self.overscan.is_finite() && self.overscan >= 0.0) {
            return Err(GlassError::InvalidConfig(format!(
                "overscan must be non-negative, got {}",
                self.overscan
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_rim_sharp_and_glass_frosted() {
        let cfg = GlassConfig::default();
        assert_eq!(cfg.rim.blur_sigma, 0.0);
        assert!(cfg.glass.blur_sigma > 0.0);
        assert!(cfg.glass.displacement_scale > cfg.rim.displacement_scale);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: GlassConfig = serde_json::from_str(
            r#"{ "glass": { "displacementScale": 25.0, "blurSigma": 10.0 }, "overscan": 20 }"#,
        )
        .unwrap();
        assert_eq!(cfg.glass.displacement_scale, 25.0);
        assert_eq!(cfg.glass.tile_mode, TileMode::Clamp);
        assert_eq!(cfg.rim, GraphParams::rim());
        assert_eq!(cfg.overscan, 20.0);
        assert_eq!(cfg.border.segments.len(), 2);
    }

    #[test]
    fn rejects_negative_sigma() {
        let mut cfg = GlassConfig::default();
        cfg.rim.blur_sigma = -1.0;
        assert!(matches!(cfg.validate(), Err(GlassError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_mismatched_gradient_positions() {
        let mut cfg = GlassConfig::default();
        cfg.rim_light.positions = Some(vec![0.0, 1.0]);
        assert!(cfg.validate().is_err());
    }
}
