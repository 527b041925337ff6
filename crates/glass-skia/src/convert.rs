//! Translation of `glass-core` types into their Skia counterparts.

use glam::Vec2;
use glass_core::{BlendMode as CoreBlendMode, Color, ColorChannel as CoreColorChannel, Region};
use glass_core::math::sanitize;
use glass_core::TileMode as CoreTileMode;
use skia_safe::{BlendMode, ColorChannel, Point, Rect, TileMode};

pub fn blend_mode(mode: CoreBlendMode) -> BlendMode {
    match mode {
        CoreBlendMode::Clear => BlendMode::Clear,
        CoreBlendMode::Src => BlendMode::Src,
        CoreBlendMode::Dst => BlendMode::Dst,
        CoreBlendMode::SrcOver => BlendMode::SrcOver,
        CoreBlendMode::DstOver => BlendMode::DstOver,
        CoreBlendMode::SrcIn => BlendMode::SrcIn,
        CoreBlendMode::DstIn => BlendMode::DstIn,
        CoreBlendMode::SrcOut => BlendMode::SrcOut,
        CoreBlendMode::DstOut => BlendMode::DstOut,
        CoreBlendMode::SrcATop => BlendMode::SrcATop,
        CoreBlendMode::DstATop => BlendMode::DstATop,
        CoreBlendMode::Xor => BlendMode::Xor,
        CoreBlendMode::Plus => BlendMode::Plus,
        CoreBlendMode::Modulate => BlendMode::Modulate,
        CoreBlendMode::Screen => BlendMode::Screen,
        CoreBlendMode::Overlay => BlendMode::Overlay,
        CoreBlendMode::Darken => BlendMode::Darken,
        CoreBlendMode::Lighten => BlendMode::Lighten,
        CoreBlendMode::ColorDodge => BlendMode::ColorDodge,
        CoreBlendMode::ColorBurn => BlendMode::ColorBurn,
        CoreBlendMode::HardLight => BlendMode::HardLight,
        CoreBlendMode::SoftLight => BlendMode::SoftLight,
        CoreBlendMode::Difference => BlendMode::Difference,
        CoreBlendMode::Exclusion => BlendMode::Exclusion,
        CoreBlendMode::Multiply => BlendMode::Multiply,
    }
}

pub fn tile_mode(mode: CoreTileMode) -> TileMode {
    match mode {
        CoreTileMode::Clamp => TileMode::Clamp,
        CoreTileMode::Repeat => TileMode::Repeat,
        CoreTileMode::Mirror => TileMode::Mirror,
        CoreTileMode::Decal => TileMode::Decal,
    }
}

pub fn color_channel(c: CoreColorChannel) -> ColorChannel {
    match c {
        CoreColorChannel::R => ColorChannel::R,
        CoreColorChannel::G => ColorChannel::G,
        CoreColorChannel::B => ColorChannel::B,
        CoreColorChannel::A => ColorChannel::A,
    }
}

/// Converts to Skia's `Color` struct (u8 based).
pub fn color(c: Color) -> skia_safe::Color {
    let [r, g, b, a] = c.to_rgba8();
    skia_safe::Color::from_argb(a, r, g, b)
}

pub fn point(v: Vec2) -> Point {
    Point::new(sanitize(v.x), sanitize(v.y))
}

pub fn rect(region: &Region) -> Rect {
    Rect::from_xywh(region.x, region.y, region.width, region.height)
}
