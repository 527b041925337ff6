//! Compositor Tests
//!
//! Graph caching per element and pixel-level checks of the backdrop passes.

use glass_core::{Color, GlassConfig, GlassLayer, Region};
use glass_skia::{Compositor, GlassElement, ShaderCache};
use skia_safe::{canvas::SaveLayerRec, surfaces, ClipOp, Surface};
use std::sync::Arc;

fn backdrop() -> skia_safe::Color {
    skia_safe::Color::from_argb(255, 30, 60, 200)
}

fn backdrop_surface(w: i32, h: i32) -> Surface {
    let mut surface = surfaces::raster_n32_premul((w, h)).unwrap();
    surface.canvas().clear(backdrop());
    surface
}

fn pixel(surface: &mut Surface, x: i32, y: i32) -> skia_safe::Color {
    let image = surface.image_snapshot();
    let pixmap = image.peek_pixels().unwrap();
    pixmap.get_color((x, y))
}

fn element() -> GlassElement {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    GlassElement::with_defaults(Region::new(40.0, 40.0, 200.0, 80.0, 24.0).unwrap()).unwrap()
}

#[test]
fn unchanged_inputs_reuse_graphs() {
    let mut el = element();
    let first = el.graphs().unwrap();
    let second = el.graphs().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(el.rebuild_count(), 1);

    // Setting identical values is not a change.
    el.set_region(*el.region()).unwrap();
    el.set_layers(el.layers().to_vec());
    let third = el.graphs().unwrap();
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(el.rebuild_count(), 1);
}

#[test]
fn radius_change_rebuilds_both_graphs() {
    let mut el = element();
    let before = el.graphs().unwrap();
    let mut region = *el.region();
    region.radius = 12.0;
    el.set_region(region).unwrap();
    let after = el.graphs().unwrap();

    assert_eq!(el.rebuild_count(), 2);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_ne!(before.glass, after.glass);
    assert_ne!(before.border, after.border);
    assert_eq!(after.uniforms.radius, 12.0);
}

#[test]
fn layer_progress_and_config_changes_rebuild() {
    let mut el = element();
    el.graphs().unwrap();

    el.set_layers(vec![GlassLayer::frost(), GlassLayer::frost()]);
    el.graphs().unwrap();
    assert_eq!(el.rebuild_count(), 2);

    el.set_progress(0.5);
    let g = el.graphs().unwrap();
    assert_eq!(el.rebuild_count(), 3);
    assert_eq!(g.uniforms.progress, 0.5);

    let mut config = GlassConfig::default();
    config.palette.pattern_frequency = 5.0;
    el.set_config(config).unwrap();
    el.graphs().unwrap();
    assert_eq!(el.rebuild_count(), 4);
}

#[test]
fn out_of_range_progress_does_not_defeat_the_cache() {
    let mut el = element();
    el.set_progress(f32::NAN);
    assert_eq!(el.progress(), 0.0);
    for _ in 0..4 {
        el.graphs().unwrap();
    }
    assert_eq!(el.rebuild_count(), 1);

    // Values past the end clamp to the same uniforms and the same key.
    el.set_progress(1.5);
    el.graphs().unwrap();
    el.set_progress(2.0);
    let g = el.graphs().unwrap();
    assert_eq!(el.rebuild_count(), 2);
    assert_eq!(g.uniforms.progress, 1.0);
}

#[test]
fn invalid_updates_are_rejected_and_keep_state() {
    let mut el = element();
    let before = el.graphs().unwrap();
    let bad = Region {
        width: -5.0,
        ..*el.region()
    };
    assert!(el.set_region(bad).is_err());
    let mut config = GlassConfig::default();
    config.overscan = -1.0;
    assert!(el.set_config(config).is_err());
    let after = el.graphs().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn repeated_draws_do_not_rebuild() {
    let mut surface = backdrop_surface(300, 200);
    let mut el = element();
    for _ in 0..5 {
        Compositor::draw(surface.canvas(), &mut el).unwrap();
    }
    assert_eq!(el.rebuild_count(), 1);
}

#[test]
fn draw_changes_interior_and_leaves_outside_alone() {
    let mut surface = backdrop_surface(300, 200);
    let mut el = element();
    Compositor::draw(surface.canvas(), &mut el).unwrap();

    // Far outside the region and the overscan.
    assert_eq!(pixel(&mut surface, 5, 5), backdrop());
    assert_eq!(pixel(&mut surface, 290, 190), backdrop());

    // Sharp corner of the region lies outside the rounded outline.
    assert_eq!(pixel(&mut surface, 40, 40), backdrop());

    // Center receives the frosted white wash.
    let center = pixel(&mut surface, 140, 80);
    assert_ne!(center, backdrop());
    assert!(center.r() > backdrop().r(), "{center:?}");
}

#[test]
fn rim_lights_top_edge_and_leaves_bottom_edge_to_glass() {
    let mut el = element();
    let mut composited = backdrop_surface(300, 200);
    Compositor::draw(composited.canvas(), &mut el).unwrap();

    // Same element with only the glass pass applied.
    let graphs = el.graphs().unwrap();
    let mut glass_only = backdrop_surface(300, 200);
    let clip = el.glass_clip();
    let canvas = glass_only.canvas();
    canvas.save();
    canvas.clip_rect(clip, ClipOp::Intersect, true);
    canvas.save_layer(&SaveLayerRec::default().bounds(&clip).backdrop(&graphs.glass_filter));
    canvas.restore();
    canvas.restore();

    // Top edge (angle 0.25) sits inside the wrapping default segment.
    let top = pixel(&mut composited, 140, 41);
    assert_ne!(top, pixel(&mut glass_only, 140, 41));
    // Bottom edge (angle 0.75) is outside every segment.
    assert_eq!(
        pixel(&mut composited, 140, 118),
        pixel(&mut glass_only, 140, 118)
    );
    assert_eq!(el.rebuild_count(), 1);
}

#[test]
fn render_layer_covers_region_plus_overscan() {
    let backdrop = backdrop_surface(300, 200).image_snapshot();
    let mut el = element();
    let layer = Compositor::render_layer(&backdrop, &mut el).unwrap();
    assert_eq!(layer.origin.x, 25);
    assert_eq!(layer.origin.y, 25);
    assert_eq!(layer.image.width(), 230);
    assert_eq!(layer.image.height(), 110);
    assert_eq!(el.rebuild_count(), 1);
}

#[test]
fn elements_are_isolated_but_share_compilations() {
    let cache = ShaderCache::new();
    let region = Region::new(10.0, 10.0, 100.0, 40.0, 12.0).unwrap();
    let mut a = GlassElement::new(
        region,
        vec![GlassLayer::frost()],
        GlassConfig::default(),
        cache.clone(),
    )
    .unwrap();
    let mut b = GlassElement::new(
        Region { x: 150.0, ..region },
        vec![GlassLayer::new(Color::new(0.2, 0.4, 1.0, 0.3), Default::default())],
        GlassConfig::default(),
        cache.clone(),
    )
    .unwrap();

    let mut surface = backdrop_surface(300, 100);
    Compositor::draw(surface.canvas(), &mut a).unwrap();
    Compositor::draw(surface.canvas(), &mut b).unwrap();
    assert_eq!(cache.compilations(), 2);

    // Changing one element leaves the other's graphs in place.
    let b_graphs = b.graphs().unwrap();
    a.set_progress(1.0);
    a.graphs().unwrap();
    assert!(Arc::ptr_eq(&b_graphs, &b.graphs().unwrap()));
    assert_eq!(b.rebuild_count(), 1);
}
