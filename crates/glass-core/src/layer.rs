//! Renderer-agnostic enums for blending and filtering, plus the tint stack.
//!
//! Backends translate these into their own types; nothing here depends on Skia.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Porter-Duff and separable blend modes used by the glass graphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Clear,
    Src,
    Dst,
    #[default]
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcATop,
    DstATop,
    Xor,
    Plus,
    Modulate,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Multiply,
}

/// Edge handling for filters that sample outside their input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileMode {
    #[default]
    Clamp,
    Repeat,
    Mirror,
    Decal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorChannel {
    R,
    G,
    B,
    A,
}

/// One tint step of the glass fill.
///
/// Layers composite in order; each later layer is blended over the result of
/// the earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassLayer {
    pub color: Color,
    #[serde(default)]
    pub blend_mode: BlendMode,
}

impl GlassLayer {
    pub fn new(color: Color, blend_mode: BlendMode) -> Self {
        Self { color, blend_mode }
    }

    /// Quarter-strength white wash; the default layer stack.
    pub fn frost() -> Self {
        Self::new(Color::new(1.0, 1.0, 1.0, 0.25), BlendMode::SrcOver)
    }
}
