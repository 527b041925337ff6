//! Filter Graph Tests
//!
//! Structure of the glass and rim DAGs, shader compilation and lowering.

use glass_core::{
    BlendMode, Color, GlassConfig, GlassError, GlassLayer, LightGradient, Region, ShaderKind,
};
use glass_skia::{FilterNode, GlassGraphs, ShaderCache, ShaderSource};

fn pill() -> Region {
    Region::new(20.0, 50.0, 361.0, 74.0, 40.0).unwrap()
}

fn blur_sigma(root: &FilterNode) -> f32 {
    match root.find(&|n| matches!(n, FilterNode::Blur { .. })) {
        Some(FilterNode::Blur { sigma_x, sigma_y, .. }) => {
            assert_eq!(sigma_x, sigma_y);
            *sigma_x
        }
        _ => panic!("graph has no blur node"),
    }
}

/// Graphs built independently from equal inputs are structurally equal.
#[test]
fn identical_inputs_build_equal_graphs() {
    let layers = vec![GlassLayer::frost()];
    let config = GlassConfig::default();
    let a = GlassGraphs::build(&ShaderCache::new(), &pill(), &layers, &config, 0.0).unwrap();
    let b = GlassGraphs::build(&ShaderCache::new(), &pill(), &layers, &config, 0.0).unwrap();

    assert_eq!(a.glass.node_count(), b.glass.node_count());
    assert_eq!(a.border.node_count(), b.border.node_count());
    assert_eq!(a.glass, b.glass);
    assert_eq!(a.border, b.border);
    assert_eq!(a.uniforms, b.uniforms);
}

#[test]
fn node_counts_follow_graph_shape() {
    let graphs = GlassGraphs::build(
        &ShaderCache::new(),
        &pill(),
        &[GlassLayer::frost()],
        &GlassConfig::default(),
        0.0,
    )
    .unwrap();
    // shader, displace, fill, tint, blur, src-in, compose
    assert_eq!(graphs.glass.node_count(), 7);
    // shader, displace, fill, gradient, screen, rim blend, blur, src-in, compose
    assert_eq!(graphs.border.node_count(), 9);
    assert!(matches!(*graphs.glass, FilterNode::Compose { .. }));
    assert!(matches!(*graphs.border, FilterNode::Compose { .. }));
}

#[test]
fn only_the_glass_graph_is_blurred() {
    let graphs = GlassGraphs::build(
        &ShaderCache::new(),
        &pill(),
        &[GlassLayer::frost()],
        &GlassConfig::default(),
        0.0,
    )
    .unwrap();
    assert_eq!(blur_sigma(&graphs.glass), 8.0);
    assert_eq!(blur_sigma(&graphs.border), 0.0);
}

#[test]
fn displacement_is_gentler_on_the_rim() {
    let graphs = GlassGraphs::build(
        &ShaderCache::new(),
        &pill(),
        &[GlassLayer::frost()],
        &GlassConfig::default(),
        0.0,
    )
    .unwrap();
    let scale = |root: &FilterNode| match root
        .find(&|n| matches!(n, FilterNode::DisplacementMap { .. }))
    {
        Some(FilterNode::DisplacementMap { scale, .. }) => *scale,
        _ => panic!("graph has no displacement node"),
    };
    assert_eq!(scale(&graphs.glass), 40.0);
    assert_eq!(scale(&graphs.border), 15.0);
}

#[test]
fn every_layer_becomes_a_tint_step_in_order() {
    let layers = vec![
        GlassLayer::new(Color::new(1.0, 0.0, 0.0, 0.2), BlendMode::SrcOver),
        GlassLayer::new(Color::new(0.0, 0.0, 1.0, 0.4), BlendMode::Multiply),
        GlassLayer::new(Color::new(1.0, 1.0, 1.0, 0.1), BlendMode::Screen),
    ];
    let graphs = GlassGraphs::build(
        &ShaderCache::new(),
        &pill(),
        &layers,
        &GlassConfig::default(),
        0.0,
    )
    .unwrap();
    assert_eq!(graphs.glass.node_count(), 5 + 2 * layers.len());

    // The outermost tint is the last layer.
    let top = graphs
        .glass
        .find(&|n| {
            matches!(
                n,
                FilterNode::Blend { mode, .. } if *mode != BlendMode::SrcIn
            )
        })
        .unwrap();
    match top {
        FilterNode::Blend { mode, .. } => assert_eq!(*mode, BlendMode::Screen),
        _ => unreachable!(),
    }
}

#[test]
fn empty_layer_stack_still_builds() {
    let graphs = GlassGraphs::build(
        &ShaderCache::new(),
        &pill(),
        &[],
        &GlassConfig::default(),
        0.0,
    )
    .unwrap();
    assert_eq!(graphs.glass.node_count(), 5);
}

#[test]
fn glass_light_adds_a_gradient_screen() {
    let config = GlassConfig {
        glass_light: Some(LightGradient::interior()),
        ..Default::default()
    };
    let graphs =
        GlassGraphs::build(&ShaderCache::new(), &pill(), &[GlassLayer::frost()], &config, 0.0)
            .unwrap();
    assert_eq!(graphs.glass.node_count(), 9);
    let gradient = graphs
        .glass
        .find(&|n| matches!(n, FilterNode::LinearGradient { .. }))
        .unwrap();
    match gradient {
        FilterNode::LinearGradient { start, end, .. } => {
            assert_eq!((start.x, start.y), (20.0, 50.0));
            assert_eq!((end.x, end.y), (381.0, 124.0));
        }
        _ => unreachable!(),
    }
}

#[test]
fn malformed_shader_fails_to_compile() {
    let cache = ShaderCache::new();
    let result = cache.get_or_compile(ShaderSource {
        kind: ShaderKind::Border,
        text: "half4 main(float2 p) { return undefined_symbol; }".into(),
    });
    match result {
        Err(GlassError::ShaderCompilation { kind, message }) => {
            assert_eq!(kind, ShaderKind::Border);
            assert!(!message.is_empty());
        }
        other => panic!("expected compilation error, got {:?}", other.map(|_| ())),
    }
    assert!(cache.is_empty());
    assert_eq!(cache.compilations(), 0);
}

#[test]
fn cache_shares_programs_between_equal_shapes() {
    let cache = ShaderCache::new();
    let config = GlassConfig::default();
    let a = Region::new(0.0, 0.0, 200.0, 60.0, 20.0).unwrap();
    // Same radius, different placement and size: same source text.
    let b = Region::new(300.0, 40.0, 120.0, 90.0, 20.0).unwrap();
    GlassGraphs::build(&cache, &a, &[GlassLayer::frost()], &config, 0.0).unwrap();
    GlassGraphs::build(&cache, &b, &[GlassLayer::frost()], &config, 0.0).unwrap();
    assert_eq!(cache.compilations(), 2);
    assert_eq!(cache.len(), 2);

    let c = Region::new(0.0, 0.0, 200.0, 60.0, 8.0).unwrap();
    GlassGraphs::build(&cache, &c, &[GlassLayer::frost()], &config, 0.0).unwrap();
    assert_eq!(cache.compilations(), 4);

    // Earlier programs stay resident; returning to a radius recompiles nothing.
    assert_eq!(cache.len(), 4);
    GlassGraphs::build(&cache, &a, &[GlassLayer::frost()], &config, 0.0).unwrap();
    assert_eq!(cache.compilations(), 4);
}

#[test]
fn invalid_config_aborts_build() {
    let mut config = GlassConfig::default();
    config.glass.blur_sigma = f32::NAN;
    let result = GlassGraphs::build(&ShaderCache::new(), &pill(), &[], &config, 0.0);
    assert!(matches!(result, Err(GlassError::InvalidConfig(_))));
}
