//! # Compositor
//!
//! Owns one glass element's inputs and its cached graphs, and applies those
//! graphs as backdrop filters: glass clipped to the region first, then the
//! rim clipped to the region grown by the overscan margin.
//!
//! Shader compilation and filter allocation dominate the cost of a frame, so
//! graphs are rebuilt only when an input they depend on changes.

use crate::convert;
use crate::graph::GlassGraphs;
use crate::shader::ShaderCache;
use glass_core::{normalize_progress, GlassConfig, GlassError, GlassLayer, Region, Result};
use skia_safe::{canvas::SaveLayerRec, surfaces, Canvas, ClipOp, IPoint, Image, ImageFilter, Rect};
use std::sync::Arc;
use tracing::{debug, trace};

/// Everything the graphs are derived from. Equal keys mean reusable graphs.
#[derive(Debug, Clone, PartialEq)]
struct GraphKey {
    region: Region,
    layers: Vec<GlassLayer>,
    config: GlassConfig,
    progress: f32,
}

/// A single glass region with its derived state.
///
/// Instances are independent; only the [`ShaderCache`] may be shared.
#[derive(Debug)]
pub struct GlassElement {
    region: Region,
    layers: Vec<GlassLayer>,
    config: GlassConfig,
    progress: f32,
    cache: ShaderCache,
    built: Option<(GraphKey, Arc<GlassGraphs>)>,
    rebuilds: usize,
}

impl GlassElement {
    pub fn new(
        region: Region,
        layers: Vec<GlassLayer>,
        config: GlassConfig,
        cache: ShaderCache,
    ) -> Result<Self> {
        region.validate()?;
        config.validate()?;
        Ok(Self {
            region,
            layers,
            config,
            progress: 0.0,
            cache,
            built: None,
            rebuilds: 0,
        })
    }

    /// Default look: one frost layer, default config, private cache.
    pub fn with_defaults(region: Region) -> Result<Self> {
        Self::new(
            region,
            vec![GlassLayer::frost()],
            GlassConfig::default(),
            ShaderCache::new(),
        )
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn layers(&self) -> &[GlassLayer] {
        &self.layers
    }

    pub fn config(&self) -> &GlassConfig {
        &self.config
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn set_region(&mut self, region: Region) -> Result<()> {
        region.validate()?;
        self.region = region;
        Ok(())
    }

    pub fn set_layers(&mut self, layers: Vec<GlassLayer>) {
        self.layers = layers;
    }

    pub fn set_config(&mut self, config: GlassConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Stored as the shaders will see it: clamped to `[0, 1]`, NaN as 0.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = normalize_progress(progress);
    }

    /// Number of times the graphs have been (re)built.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    fn key(&self) -> GraphKey {
        GraphKey {
            region: self.region,
            layers: self.layers.clone(),
            config: self.config.clone(),
            progress: self.progress,
        }
    }

    /// Current graphs, rebuilt only if an input changed since the last call.
    pub fn graphs(&mut self) -> Result<Arc<GlassGraphs>> {
        let key = self.key();
        if let Some((built_key, graphs)) = &self.built {
            if *built_key == key {
                trace!("glass graphs reused");
                return Ok(graphs.clone());
            }
        }
        // Drop stale graphs first so a failed rebuild never leaves them in use.
        self.built = None;
        let graphs = Arc::new(GlassGraphs::build(
            &self.cache,
            &key.region,
            &key.layers,
            &key.config,
            key.progress,
        )?);
        self.rebuilds += 1;
        debug!(rebuilds = self.rebuilds, "glass graphs rebuilt");
        self.built = Some((key, graphs.clone()));
        Ok(graphs)
    }

    /// Clip for the glass graph: the region itself.
    pub fn glass_clip(&self) -> Rect {
        convert::rect(&self.region)
    }

    /// Clip for the rim graph: the region grown by the overscan margin.
    pub fn border_clip(&self) -> Rect {
        convert::rect(&self.region.expanded(self.config.overscan))
    }
}

/// A composited layer and where its top-left belongs in host space.
#[derive(Debug, Clone)]
pub struct RenderedLayer {
    pub image: Image,
    pub origin: IPoint,
}

pub struct Compositor;

impl Compositor {
    /// Applies the element onto whatever `canvas` already holds.
    pub fn draw(canvas: &Canvas, element: &mut GlassElement) -> Result<()> {
        let graphs = element.graphs()?;
        apply_backdrop(canvas, element.glass_clip(), &graphs.glass_filter);
        apply_backdrop(canvas, element.border_clip(), &graphs.border_filter);
        Ok(())
    }

    /// Renders the element over `backdrop` (in host space, origin at 0,0) into
    /// a layer covering the region plus overscan.
    pub fn render_layer(backdrop: &Image, element: &mut GlassElement) -> Result<RenderedLayer> {
        let bounds = element.border_clip().round_out();
        let mut surface = surfaces::raster_n32_premul((bounds.width(), bounds.height()))
            .ok_or_else(|| {
                GlassError::FilterGraph(format!(
                    "could not allocate a {}x{} layer",
                    bounds.width(),
                    bounds.height()
                ))
            })?;
        let canvas = surface.canvas();
        canvas.translate((-bounds.left as f32, -bounds.top as f32));
        canvas.draw_image(backdrop, (0.0, 0.0), None);
        Self::draw(canvas, element)?;
        Ok(RenderedLayer {
            image: surface.image_snapshot(),
            origin: IPoint::new(bounds.left, bounds.top),
        })
    }
}

fn apply_backdrop(canvas: &Canvas, clip: Rect, filter: &ImageFilter) {
    canvas.save();
    canvas.clip_rect(clip, ClipOp::Intersect, true);
    canvas.save_layer(&SaveLayerRec::default().bounds(&clip).backdrop(filter));
    canvas.restore();
    canvas.restore();
}
