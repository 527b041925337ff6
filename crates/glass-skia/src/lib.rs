//! # Glass Skia
//!
//! Skia backend for the procedural glass effect.
//!
//! * [`sksl`] turns a [`GlassConfig`] into runtime-shader source.
//! * [`shader`] compiles that source and shares compiled programs.
//! * [`graph`] describes the glass and rim filter DAGs and lowers them.
//! * [`compositor`] caches the graphs per element and applies them as backdrop
//!   filters over a canvas.
//!
//! ```rust,no_run
//! use glass_core::Region;
//! use glass_skia::{Compositor, GlassElement};
//! use skia_safe::surfaces;
//!
//! let mut surface = surfaces::raster_n32_premul((400, 200)).unwrap();
//! surface.canvas().clear(skia_safe::Color::from_rgb(30, 60, 200));
//! let mut element = GlassElement::with_defaults(Region::new(20.0, 50.0, 361.0, 74.0, 40.0)?)?;
//! Compositor::draw(surface.canvas(), &mut element)?;
//! # Ok::<(), glass_core::GlassError>(())
//! ```
//!
//! [`GlassConfig`]: glass_core::GlassConfig

pub mod compositor;
pub mod convert;
pub mod graph;
pub mod shader;
pub mod sksl;

pub use compositor::{Compositor, GlassElement, RenderedLayer};
pub use graph::{build_border_graph, build_glass_graph, FilterInput, FilterNode, GlassGraphs};
pub use shader::{ShaderCache, ShaderProgram};
pub use sksl::{generate, ShaderSource};
