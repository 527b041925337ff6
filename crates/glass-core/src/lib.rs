//! # Glass Core
//!
//! Renderer-agnostic model of the procedural glass effect: where a glass
//! region sits, how far each point is from its outline, which parts of the
//! rim are lit, and what color the interior takes.
//!
//! The functions here are the reference semantics of the shaders generated
//! by `glass-skia`; both sides must agree sample for sample.
//!
//! ```rust
//! use glass_core::{GlassConfig, Region, ShapeKind};
//! use glam::Vec2;
//!
//! let region = Region::new(20.0, 50.0, 361.0, 74.0, 40.0).unwrap();
//! let config = GlassConfig::default();
//! let shape = region.rounded_box(ShapeKind::RoundedRect, None);
//! let sample = shape.evaluate(Vec2::new(200.5, 52.0));
//! let rim = config.border.alpha(&sample);
//! assert!(rim > 0.0);
//! ```

pub mod border;
pub mod color;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod palette;
pub mod preview;
pub mod uniforms;

pub use border::{BorderStyle, SegmentSpec};
pub use color::Color;
pub use config::{GlassConfig, GraphParams, LightGradient};
pub use errors::{GlassError, Result, ShaderKind};
pub use geometry::{evaluate, CornerRadii, Region, RoundedBox, ShapeKind, ShapeSample};
pub use layer::{BlendMode, ColorChannel, GlassLayer, TileMode};
pub use palette::GlassPalette;
pub use uniforms::{normalize_progress, UniformSet, UNIFORM_SCHEMA};
