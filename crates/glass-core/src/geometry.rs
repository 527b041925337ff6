//! # Geometry Module
//!
//! Placement of a glass region and the signed-distance evaluation of its shape.
//!
//! ## Coordinate Systems
//! - **Host space**: the caller's layout space. Origin top-left, y grows downward.
//!   `Region` is expressed here.
//! - **Local space**: centered on the region, y grows *upward*. Distances and
//!   perimeter angles are measured here, so angle 0.25 is the top edge.

use crate::errors::{GlassError, Result};
use crate::math::turn_fraction;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An axis-aligned rectangle with a uniform corner radius, in host space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub radius: f32,
}

impl Region {
    /// Creates a validated region.
    ///
    /// Non-finite values and non-positive sizes are rejected. An oversized
    /// radius is accepted here and clamped when the shape is derived.
    pub fn new(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Result<Self> {
        let region = Self {
            x,
            y,
            width,
            height,
            radius,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [self.x, self.y, self.width, self.height, self.radius];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(GlassError::InvalidGeometry(format!(
                "non-finite region field in {:?}",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(GlassError::InvalidGeometry(format!(
                "region size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Absolute center in host space.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Largest corner radius the region can carry: half its smaller side.
    pub fn max_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// The radius actually used for rendering.
    pub fn effective_radius(&self) -> f32 {
        self.radius.clamp(0.0, self.max_radius())
    }

    /// Grows the rectangle by `margin` on every side. The radius is unchanged.
    pub fn expanded(&self, margin: f32) -> Region {
        Region {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
            radius: self.radius,
        }
    }

    /// Derives the evaluable shape, clamping radii that do not fit.
    ///
    /// `radii` overrides the uniform `radius` per corner when given.
    pub fn rounded_box(&self, kind: ShapeKind, radii: Option<CornerRadii>) -> RoundedBox {
        let max = self.max_radius();
        let requested = radii.unwrap_or_else(|| CornerRadii::uniform(self.radius));
        let clamped = requested.clamped(max);
        if clamped != requested {
            warn!(
                requested = ?requested,
                max_radius = max,
                "corner radius exceeds half the smaller side; clamping"
            );
        }
        RoundedBox {
            kind,
            center: self.center(),
            half_extents: self.half_extents(),
            radii: clamped,
        }
    }
}

/// Per-corner radii, named in local space (top is +y).
///
/// The order mirrors the `vec4` the generated shader receives:
/// `(top_right, bottom_right, top_left, bottom_left)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_right: f32,
    pub bottom_right: f32,
    pub top_left: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    pub fn uniform(r: f32) -> Self {
        Self {
            top_right: r,
            bottom_right: r,
            top_left: r,
            bottom_left: r,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [
            self.top_right,
            self.bottom_right,
            self.top_left,
            self.bottom_left,
        ]
    }

    /// Each corner limited to `[0, max]`.
    pub fn clamped(&self, max: f32) -> Self {
        let c = |r: f32| if r.is_finite() { r.clamp(0.0, max) } else { 0.0 };
        Self {
            top_right: c(self.top_right),
            bottom_right: c(self.bottom_right),
            top_left: c(self.top_left),
            bottom_left: c(self.bottom_left),
        }
    }

    /// Picks the radius of the quadrant a local point falls in.
    pub fn select(&self, local: Vec2) -> f32 {
        let (upper, lower) = if local.x > 0.0 {
            (self.top_right, self.bottom_right)
        } else {
            (self.top_left, self.bottom_left)
        };
        if local.y > 0.0 {
            upper
        } else {
            lower
        }
    }
}

/// Outline family evaluated by the SDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    RoundedRect,
    /// Circle inscribed in the region, radius `min(halfW, halfH)`.
    Circle,
}

/// Result of evaluating the shape at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSample {
    /// Negative inside, zero on the boundary, positive outside.
    pub distance: f32,
    /// Perimeter angle in `[0, 1)`: 0 right, 0.25 top, 0.5 left, 0.75 bottom.
    pub angle: f32,
}

/// A shape ready for evaluation: absolute center, half extents and clamped radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedBox {
    pub kind: ShapeKind,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub radii: CornerRadii,
}

impl RoundedBox {
    /// Evaluates the shape at a host-space point.
    pub fn evaluate(&self, point: Vec2) -> ShapeSample {
        let local = Vec2::new(point.x - self.center.x, self.center.y - point.y);
        self.evaluate_local(local)
    }

    /// Evaluates the shape at a point already in local space.
    pub fn evaluate_local(&self, local: Vec2) -> ShapeSample {
        let distance = match self.kind {
            ShapeKind::RoundedRect => {
                let r = self.radii.select(local);
                let q = local.abs() - self.half_extents + Vec2::splat(r);
                q.x.max(q.y).min(0.0) + q.max(Vec2::ZERO).length() - r
            }
            ShapeKind::Circle => local.length() - self.half_extents.min_element(),
        };
        ShapeSample {
            distance,
            angle: turn_fraction(local.x, local.y),
        }
    }
}

/// Evaluates `shape` at a host-space point.
pub fn evaluate(shape: &RoundedBox, point: Vec2) -> ShapeSample {
    shape.evaluate(point)
}
