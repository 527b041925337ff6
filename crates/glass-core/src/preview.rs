//! CPU rasterization of the two shader functions.
//!
//! Produces straight-alpha RGBA8 buffers from the reference evaluators, for
//! inspecting the generated patterns without a GPU context.

use crate::color::Color;
use crate::config::GlassConfig;
use crate::geometry::Region;
use glam::Vec2;

pub struct PreviewBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, not premultiplied.
    pub pixels: Vec<u8>,
}

impl PreviewBuffer {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.pixels.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Evaluates `shade` at every pixel center of a `width` x `height` canvas.
pub fn rasterize(width: u32, height: u32, shade: impl Fn(Vec2) -> Color) -> PreviewBuffer {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let c = shade(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            pixels.extend_from_slice(&c.to_rgba8());
        }
    }
    PreviewBuffer {
        width,
        height,
        pixels,
    }
}

/// The interior color function over a canvas.
pub fn glass_preview(region: &Region, config: &GlassConfig, width: u32, height: u32) -> PreviewBuffer {
    let shape = region.rounded_box(config.shape, config.corner_radii);
    let radius = region.effective_radius();
    rasterize(width, height, |p| {
        config.palette.shade(&shape.evaluate(p), radius)
    })
}

/// The white rim mask over a canvas.
pub fn border_preview(region: &Region, config: &GlassConfig, width: u32, height: u32) -> PreviewBuffer {
    let shape = region.rounded_box(config.shape, config.corner_radii);
    rasterize(width, height, |p| {
        let alpha = config.border.alpha(&shape.evaluate(p));
        Color::WHITE.with_alpha(alpha)
    })
}
