//! # Filter Graph
//!
//! Describes the two image-filter DAGs of a glass element as plain data, then
//! lowers them into `skia_safe::ImageFilter`s.
//!
//! Keeping a description separate from the Skia objects makes the graphs
//! comparable: two graphs built from equal inputs compare equal node for node.
//! Nodes are immutable and shared through `Arc`, which rules out cycles.
//!
//! ## Graph Shapes
//! ```text
//! glass:  Compose(outer: Blend(SrcIn, shader, backdrop),
//!                 inner: Blur(sigma, [Screen light,] Tint_n(..Tint_1(Displace(shader, backdrop)))))
//! border: Compose(outer: Blend(SrcIn, shader, backdrop),
//!                 inner: Blur(0, Blend(rim, Displace(shader, backdrop), Blend(Screen, tint, light))))
//! ```
//! The outer `SrcIn` keeps the refracted result only where the shader has
//! coverage, so nothing paints outside the outline. Only the blur sigma
//! separates a frosted interior from a crisp rim.

use crate::convert;
use crate::shader::{ShaderCache, ShaderProgram};
use crate::sksl;
use glam::Vec2;
use glass_core::{
    BlendMode, Color, ColorChannel, GlassConfig, GlassError, GlassLayer, GraphParams,
    LightGradient, Region, Result, ShaderKind, TileMode, UniformSet,
};
use skia_safe::{gradient_shader, image_filters, shaders, ImageFilter};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Where a node reads its pixels from.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    /// The content behind the layer (the filter's source image).
    Backdrop,
    Node(Arc<FilterNode>),
}

impl From<Arc<FilterNode>> for FilterInput {
    fn from(node: Arc<FilterNode>) -> Self {
        FilterInput::Node(node)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Shader {
        program: Arc<ShaderProgram>,
        uniforms: UniformSet,
    },
    /// `foreground` drawn onto `background` with `mode`.
    Blend {
        mode: BlendMode,
        background: FilterInput,
        foreground: FilterInput,
    },
    Blur {
        sigma_x: f32,
        sigma_y: f32,
        tile_mode: TileMode,
        input: FilterInput,
    },
    /// Offsets `color` by the chosen channels of `displacement`.
    DisplacementMap {
        x_channel: ColorChannel,
        y_channel: ColorChannel,
        scale: f32,
        displacement: FilterInput,
        color: FilterInput,
    },
    /// `outer(inner(source))`.
    Compose {
        outer: Arc<FilterNode>,
        inner: Arc<FilterNode>,
    },
    ColorFill(Color),
    LinearGradient {
        start: Vec2,
        end: Vec2,
        colors: Vec<Color>,
        positions: Option<Vec<f32>>,
    },
}

impl FilterNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterNode::Shader { .. } => "shader",
            FilterNode::Blend { .. } => "blend",
            FilterNode::Blur { .. } => "blur",
            FilterNode::DisplacementMap { .. } => "displacement_map",
            FilterNode::Compose { .. } => "compose",
            FilterNode::ColorFill(_) => "color_fill",
            FilterNode::LinearGradient { .. } => "linear_gradient",
        }
    }

    /// Direct predecessors, excluding the backdrop.
    pub fn children(&self) -> Vec<&Arc<FilterNode>> {
        fn node(input: &FilterInput) -> Option<&Arc<FilterNode>> {
            match input {
                FilterInput::Node(n) => Some(n),
                FilterInput::Backdrop => None,
            }
        }
        match self {
            FilterNode::Blend {
                background,
                foreground,
                ..
            } => [node(background), node(foreground)].into_iter().flatten().collect(),
            FilterNode::Blur { input, .. } => node(input).into_iter().collect(),
            FilterNode::DisplacementMap {
                displacement,
                color,
                ..
            } => [node(displacement), node(color)].into_iter().flatten().collect(),
            FilterNode::Compose { outer, inner } => vec![outer, inner],
            FilterNode::Shader { .. } | FilterNode::ColorFill(_) | FilterNode::LinearGradient { .. } => {
                Vec::new()
            }
        }
    }

    /// Distinct nodes reachable from here, this one included.
    pub fn node_count(&self) -> usize {
        fn walk(node: &FilterNode, seen: &mut HashSet<*const FilterNode>) {
            if !seen.insert(node as *const FilterNode) {
                return;
            }
            for child in node.children() {
                walk(child, seen);
            }
        }
        let mut seen = HashSet::new();
        walk(self, &mut seen);
        seen.len()
    }

    /// Finds the first node (depth-first, outer before inner) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&FilterNode) -> bool) -> Option<&FilterNode> {
        if pred(self) {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(pred))
    }

    /// Lowers the DAG into a Skia filter. Shared nodes are lowered once.
    pub fn to_image_filter(&self) -> Result<ImageFilter> {
        Lowering::default().lower(self)
    }
}

#[derive(Default)]
struct Lowering {
    memo: HashMap<*const FilterNode, ImageFilter>,
}

impl Lowering {
    fn input(&mut self, input: &FilterInput) -> Result<Option<ImageFilter>> {
        match input {
            FilterInput::Backdrop => Ok(None),
            FilterInput::Node(node) => self.lower(node).map(Some),
        }
    }

    fn lower(&mut self, node: &FilterNode) -> Result<ImageFilter> {
        let key = node as *const FilterNode;
        if let Some(filter) = self.memo.get(&key) {
            return Ok(filter.clone());
        }
        let filter = match node {
            FilterNode::Shader { program, uniforms } => {
                image_filters::shader(program.make_shader(uniforms)?, None)
            }
            FilterNode::Blend {
                mode,
                background,
                foreground,
            } => {
                let background = self.input(background)?;
                let foreground = self.input(foreground)?;
                image_filters::blend(convert::blend_mode(*mode), background, foreground, None)
            }
            FilterNode::Blur {
                sigma_x,
                sigma_y,
                tile_mode,
                input,
            } => {
                let input = self.input(input)?;
                image_filters::blur(
                    (*sigma_x, *sigma_y),
                    convert::tile_mode(*tile_mode),
                    input,
                    None,
                )
            }
            FilterNode::DisplacementMap {
                x_channel,
                y_channel,
                scale,
                displacement,
                color,
            } => {
                let displacement = self.input(displacement)?;
                let color = self.input(color)?;
                image_filters::displacement_map(
                    (
                        convert::color_channel(*x_channel),
                        convert::color_channel(*y_channel),
                    ),
                    *scale,
                    displacement,
                    color,
                    None,
                )
            }
            FilterNode::Compose { outer, inner } => {
                let outer = self.lower(outer)?;
                let inner = self.lower(inner)?;
                image_filters::compose(outer, inner)
            }
            FilterNode::ColorFill(color) => {
                image_filters::shader(shaders::color(convert::color(*color)), None)
            }
            FilterNode::LinearGradient {
                start,
                end,
                colors,
                positions,
            } => {
                let colors: Vec<skia_safe::Color> =
                    colors.iter().map(|c| convert::color(*c)).collect();
                let shader = gradient_shader::linear(
                    (convert::point(*start), convert::point(*end)),
                    colors.as_slice(),
                    positions.as_deref(),
                    skia_safe::TileMode::Clamp,
                    None,
                    None,
                )
                .ok_or_else(|| {
                    GlassError::FilterGraph("linear gradient shader could not be created".into())
                })?;
                image_filters::shader(shader, None)
            }
        }
        .ok_or_else(|| {
            GlassError::FilterGraph(format!("skia rejected {} node", node.kind_name()))
        })?;
        self.memo.insert(key, filter.clone());
        Ok(filter)
    }
}

fn arc(node: FilterNode) -> Arc<FilterNode> {
    Arc::new(node)
}

fn displaced(shader: &Arc<FilterNode>, params: &GraphParams) -> FilterNode {
    FilterNode::DisplacementMap {
        x_channel: ColorChannel::R,
        y_channel: ColorChannel::G,
        scale: params.displacement_scale,
        displacement: shader.clone().into(),
        color: FilterInput::Backdrop,
    }
}

fn light(region: &Region, gradient: &LightGradient) -> FilterNode {
    FilterNode::LinearGradient {
        start: Vec2::new(region.x, region.y),
        end: Vec2::new(region.x + region.width, region.y + region.height),
        colors: gradient.colors.clone(),
        positions: gradient.positions.clone(),
    }
}

/// Blurs `inner` and clips the result to the shader's coverage.
fn finish(shader: &Arc<FilterNode>, inner: FilterNode, params: &GraphParams) -> Arc<FilterNode> {
    let blurred = FilterNode::Blur {
        sigma_x: params.blur_sigma,
        sigma_y: params.blur_sigma,
        tile_mode: params.tile_mode,
        input: arc(inner).into(),
    };
    arc(FilterNode::Compose {
        outer: arc(FilterNode::Blend {
            mode: BlendMode::SrcIn,
            background: shader.clone().into(),
            foreground: FilterInput::Backdrop,
        }),
        inner: arc(blurred),
    })
}

/// Interior graph: refract, tint through every layer in order, frost.
pub fn build_glass_graph(
    program: Arc<ShaderProgram>,
    uniforms: UniformSet,
    region: &Region,
    layers: &[GlassLayer],
    config: &GlassConfig,
) -> Arc<FilterNode> {
    let shader = arc(FilterNode::Shader { program, uniforms });
    if layers.is_empty() {
        warn!("glass element has no layers; the fill will carry no tint");
    }
    let tinted = layers.iter().fold(displaced(&shader, &config.glass), |acc, layer| {
        FilterNode::Blend {
            mode: layer.blend_mode,
            background: arc(acc).into(),
            foreground: arc(FilterNode::ColorFill(layer.color)).into(),
        }
    });
    let lit = match &config.glass_light {
        Some(gradient) => FilterNode::Blend {
            mode: BlendMode::Screen,
            background: arc(tinted).into(),
            foreground: arc(light(region, gradient)).into(),
        },
        None => tinted,
    };
    finish(&shader, lit, &config.glass)
}

/// Rim graph: gentle refraction under a lit white tint, never blurred by default.
pub fn build_border_graph(
    program: Arc<ShaderProgram>,
    uniforms: UniformSet,
    region: &Region,
    config: &GlassConfig,
) -> Arc<FilterNode> {
    let shader = arc(FilterNode::Shader { program, uniforms });
    let lit_tint = FilterNode::Blend {
        mode: BlendMode::Screen,
        background: arc(FilterNode::ColorFill(config.rim_tint)).into(),
        foreground: arc(light(region, &config.rim_light)).into(),
    };
    let rim = FilterNode::Blend {
        mode: config.rim_blend,
        background: arc(displaced(&shader, &config.rim)).into(),
        foreground: arc(lit_tint).into(),
    };
    finish(&shader, rim, &config.rim)
}

/// Both graphs of one element, described and lowered.
pub struct GlassGraphs {
    pub uniforms: UniformSet,
    pub glass: Arc<FilterNode>,
    pub border: Arc<FilterNode>,
    pub glass_filter: ImageFilter,
    pub border_filter: ImageFilter,
}

impl GlassGraphs {
    /// Generates and compiles (or reuses) both shaders, builds both DAGs and
    /// lowers them. Any failure aborts the whole element.
    #[instrument(level = "debug", skip_all, fields(x = region.x, y = region.y, w = region.width, h = region.height))]
    pub fn build(
        cache: &ShaderCache,
        region: &Region,
        layers: &[GlassLayer],
        config: &GlassConfig,
        progress: f32,
    ) -> Result<Self> {
        region.validate()?;
        config.validate()?;
        let radii = region.rounded_box(config.shape, config.corner_radii).radii;
        let uniforms = UniformSet::from_region(region, progress);

        let glass_program = cache.get_or_compile(sksl::generate(ShaderKind::Glass, config, radii))?;
        let border_program =
            cache.get_or_compile(sksl::generate(ShaderKind::Border, config, radii))?;

        let glass = build_glass_graph(glass_program, uniforms, region, layers, config);
        let border = build_border_graph(border_program, uniforms, region, config);
        let glass_filter = glass.to_image_filter()?;
        let border_filter = border.to_image_filter()?;
        debug!(
            glass_nodes = glass.node_count(),
            border_nodes = border.node_count(),
            "built glass filter graphs"
        );
        Ok(Self {
            uniforms,
            glass,
            border,
            glass_filter,
            border_filter,
        })
    }
}

impl std::fmt::Debug for GlassGraphs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlassGraphs")
            .field("uniforms", &self.uniforms)
            .field("glass", &self.glass)
            .field("border", &self.border)
            .finish()
    }
}
