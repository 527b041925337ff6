//! Uniform values fed to both generated shaders.
//!
//! The names and types below are the stable contract between the generated
//! SkSL and whoever binds it; changing one requires changing
//! [`UNIFORM_SCHEMA`] and the generator together.

use crate::geometry::Region;
use crate::math::mix;
use glam::Vec2;

/// `(name, float count)` for every uniform, in declaration order.
pub const UNIFORM_SCHEMA: [(&str, usize); 5] = [
    ("progress", 1),
    ("controlPoint", 2),
    ("box", 4),
    ("radius", 1),
    ("position", 2),
];

/// Maps any progress value onto `[0, 1]`; non-finite input becomes 0.
pub fn normalize_progress(progress: f32) -> f32 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSet {
    /// Morph progress in `[0, 1]`.
    pub progress: f32,
    /// Local-space point derived from `progress`.
    pub control_point: Vec2,
    /// Half extents packed as `[w/2, h/2, w/2, h/2]`.
    pub box_extents: [f32; 4],
    /// Effective (clamped) corner radius.
    pub radius: f32,
    /// Absolute center of the region in host space.
    pub position: Vec2,
}

impl UniformSet {
    /// Derives a fresh set from geometry. Never patched in place: any input
    /// change produces a new value.
    pub fn from_region(region: &Region, progress: f32) -> Self {
        let progress = normalize_progress(progress);
        let radius = region.effective_radius();
        let half = region.half_extents();
        Self {
            progress,
            control_point: Vec2::new(mix(radius, 3.5 * radius, progress), 0.0),
            box_extents: [half.x, half.y, half.x, half.y],
            radius,
            position: region.center(),
        }
    }

    /// Uniform values keyed by their shader names, in schema order.
    pub fn entries(&self) -> [(&'static str, Vec<f32>); 5] {
        [
            (UNIFORM_SCHEMA[0].0, vec![self.progress]),
            (
                UNIFORM_SCHEMA[1].0,
                vec![self.control_point.x, self.control_point.y],
            ),
            (UNIFORM_SCHEMA[2].0, self.box_extents.to_vec()),
            (UNIFORM_SCHEMA[3].0, vec![self.radius]),
            (UNIFORM_SCHEMA[4].0, vec![self.position.x, self.position.y]),
        ]
    }
}
