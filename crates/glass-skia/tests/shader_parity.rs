//! Shader Parity Tests
//!
//! Rasterizes the compiled runtime shaders and compares them, pixel by pixel,
//! with the CPU evaluators in `glass_core::preview`.

use glass_core::preview::{border_preview, glass_preview, PreviewBuffer};
use glass_core::{GlassConfig, Region, SegmentSpec, ShaderKind, UniformSet};
use glass_skia::{generate, ShaderCache};
use skia_safe::{surfaces, Paint};

const WIDTH: i32 = 280;
const HEIGHT: i32 = 160;

/// Alpha may differ by rounding and by the approximations Skia uses for
/// `atan` and `sin`.
const ALPHA_TOLERANCE: i32 = 3;
/// Color channels are only compared where unpremultiplying is stable.
const COLOR_TOLERANCE: i32 = 6;
const MIN_ALPHA_FOR_COLOR: u8 = 128;

fn region() -> Region {
    Region::new(40.0, 40.0, 200.0, 80.0, 24.0).unwrap()
}

/// Draws `kind` across a transparent surface, returning unpremultiplied RGBA8.
fn render_shader(kind: ShaderKind, region: &Region, config: &GlassConfig) -> Vec<[u8; 4]> {
    let cache = ShaderCache::new();
    let radii = region.rounded_box(config.shape, config.corner_radii).radii;
    let program = cache.get_or_compile(generate(kind, config, radii)).unwrap();
    assert_eq!(program.kind(), kind);
    assert!(program.source().text.contains("half4 main(float2 p)"));

    let shader = program
        .make_shader(&UniformSet::from_region(region, 0.0))
        .unwrap();
    let mut surface = surfaces::raster_n32_premul((WIDTH, HEIGHT)).unwrap();
    let mut paint = Paint::default();
    paint.set_shader(shader);
    surface.canvas().draw_paint(&paint);

    let image = surface.image_snapshot();
    let pixmap = image.peek_pixels().unwrap();
    let mut out = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let c = pixmap.get_color((x, y));
            out.push([c.r(), c.g(), c.b(), c.a()]);
        }
    }
    out
}

/// Counts pixels that disagree beyond tolerance.
fn mismatches(gpu: &[[u8; 4]], cpu: &PreviewBuffer) -> usize {
    assert_eq!(gpu.len() * 4, cpu.pixels.len());
    gpu.iter()
        .zip(cpu.pixels.chunks_exact(4))
        .filter(|(g, c)| {
            let alpha_off = (g[3] as i32 - c[3] as i32).abs() > ALPHA_TOLERANCE;
            let color_off = c[3] >= MIN_ALPHA_FOR_COLOR
                && (0..3).any(|i| (g[i] as i32 - c[i] as i32).abs() > COLOR_TOLERANCE);
            alpha_off || color_off
        })
        .count()
}

/// Pixel centers that land exactly on a branch boundary may round either way.
fn assert_matches(kind: ShaderKind, gpu: &[[u8; 4]], cpu: &PreviewBuffer) {
    let bad = mismatches(gpu, cpu);
    let budget = gpu.len() / 200;
    assert!(
        bad <= budget,
        "{kind} shader disagrees with CPU reference at {bad} pixels (allowed {budget})"
    );
}

fn coverage(buf: &[[u8; 4]]) -> usize {
    buf.iter().filter(|p| p[3] > 0).count()
}

#[test]
fn glass_shader_matches_cpu_reference() {
    let region = region();
    let config = GlassConfig::default();
    let gpu = render_shader(ShaderKind::Glass, &region, &config);
    let cpu = glass_preview(&region, &config, WIDTH as u32, HEIGHT as u32);
    assert!(coverage(&gpu) > 0);
    assert_matches(ShaderKind::Glass, &gpu, &cpu);
}

#[test]
fn border_shader_matches_cpu_reference() {
    let region = region();
    let config = GlassConfig::default();
    let gpu = render_shader(ShaderKind::Border, &region, &config);
    let cpu = border_preview(&region, &config, WIDTH as u32, HEIGHT as u32);
    assert!(coverage(&gpu) > 0);
    assert_matches(ShaderKind::Border, &gpu, &cpu);

    // Rim output is premultiplied white: every lit pixel unpremultiplies to white.
    assert!(gpu
        .iter()
        .filter(|p| p[3] >= MIN_ALPHA_FOR_COLOR)
        .all(|p| p[0] >= 250 && p[1] >= 250 && p[2] >= 250));
}

#[test]
fn wrapping_segment_and_circle_match_cpu_reference() {
    let region = region();
    let mut config = GlassConfig::default();
    config.border.segments = vec![SegmentSpec::new(0.9, 0.1, 0.02, 0.02)];
    config.border.thickness = 6.0;
    let gpu = render_shader(ShaderKind::Border, &region, &config);
    let cpu = border_preview(&region, &config, WIDTH as u32, HEIGHT as u32);
    assert_matches(ShaderKind::Border, &gpu, &cpu);

    // Right end of the region is lit, the top edge is not.
    let at = |x: i32, y: i32| gpu[(y * WIDTH + x) as usize][3];
    assert!(at(237, 80) > 0);
    assert_eq!(at(140, 41), 0);

    config.shape = glass_core::ShapeKind::Circle;
    let gpu = render_shader(ShaderKind::Glass, &region, &config);
    let cpu = glass_preview(&region, &config, WIDTH as u32, HEIGHT as u32);
    assert_matches(ShaderKind::Glass, &gpu, &cpu);
}
