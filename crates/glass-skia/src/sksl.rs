//! # SkSL Generation
//!
//! Emits the runtime-shader source for the glass fill and the rim.
//!
//! The text is a pure function of the shape kind, the clamped corner radii and
//! the pattern parameters, so identical inputs always yield byte-identical
//! source and the compiled program can be shared through [`ShaderCache`].
//! Per-region placement (center, half extents, radius) travels in uniforms
//! following [`UNIFORM_SCHEMA`], never in the text.
//!
//! Every function mirrors its `glass_core` counterpart. Outputs are
//! premultiplied, as Skia expects from a runtime shader.
//!
//! [`ShaderCache`]: crate::shader::ShaderCache
//! [`UNIFORM_SCHEMA`]: glass_core::UNIFORM_SCHEMA

use glass_core::border::MIN_FADE;
use glass_core::{
    BorderStyle, Color, CornerRadii, GlassConfig, GlassPalette, SegmentSpec, ShaderKind, ShapeKind,
    UNIFORM_SCHEMA,
};

/// Generated program text tagged with the role it plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub kind: ShaderKind,
    pub text: String,
}

/// Source for `kind` under `config`, with `radii` already clamped to the region.
pub fn generate(kind: ShaderKind, config: &GlassConfig, radii: CornerRadii) -> ShaderSource {
    let mut text = String::new();
    text.push_str(&uniform_block());
    text.push_str(&shape_fn(config.shape));
    text.push_str(COMMON_FNS);
    match kind {
        ShaderKind::Glass => text.push_str(&glass_main(&config.palette, radii)),
        ShaderKind::Border => {
            text.push_str(SEGMENT_FN);
            text.push_str(&border_main(&config.border, radii));
        }
    }
    ShaderSource { kind, text }
}

/// Formats a float as an SkSL literal (always with a decimal point or exponent).
pub fn fmt_f32(v: f32) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    format!("{:?}", v)
}

fn float3(c: Color) -> String {
    format!("float3({}, {}, {})", fmt_f32(c.r), fmt_f32(c.g), fmt_f32(c.b))
}

fn float4(v: [f32; 4]) -> String {
    format!(
        "float4({}, {}, {}, {})",
        fmt_f32(v[0]),
        fmt_f32(v[1]),
        fmt_f32(v[2]),
        fmt_f32(v[3])
    )
}

fn uniform_block() -> String {
    UNIFORM_SCHEMA
        .iter()
        .map(|(name, width)| {
            let ty = match width {
                1 => "float",
                2 => "float2",
                3 => "float3",
                _ => "float4",
            };
            format!("uniform {} {};\n", ty, name)
        })
        .collect::<String>()
        + "\n"
}

fn shape_fn(kind: ShapeKind) -> String {
    match kind {
        ShapeKind::RoundedRect => r#"float sdShape(float2 p, float2 b, float4 cr) {
    cr.xy = (p.x > 0.0) ? cr.xy : cr.zw;
    cr.x = (p.y > 0.0) ? cr.x : cr.y;
    float2 q = abs(p) - b + cr.x;
    return min(max(q.x, q.y), 0.0) + length(max(q, 0.0)) - cr.x;
}

"#
        .to_string(),
        ShapeKind::Circle => r#"float sdShape(float2 p, float2 b, float4 cr) {
    return length(p) - min(b.x, b.y);
}

"#
        .to_string(),
    }
}

// Local space is centered on `position` with y pointing up.
const COMMON_FNS: &str = r#"float2 localPoint(float2 p) {
    return float2(p.x - position.x, position.y - p.y);
}

float perimeterAngle(float2 p) {
    if (p.x == 0.0 && p.y == 0.0) {
        return 0.0;
    }
    float t = atan(p.y, p.x) / 6.283185307179586;
    if (t < 0.0) {
        t += 1.0;
    }
    return (t >= 1.0) ? 0.0 : t;
}

"#;

const SEGMENT_FN: &str = r#"float segmentMask(float t, float start, float end, float fadeIn, float fadeOut, bool wraps) {
    float u = (wraps && t < start) ? t + 1.0 : t;
    if (u < start || u > end) {
        return 0.0;
    }
    return smoothstep(start, start + fadeIn, u) * smoothstep(end, end - fadeOut, u);
}

"#;

fn segment_call(seg: &SegmentSpec) -> String {
    format!(
        "    segment = max(segment, segmentMask(t, {}, {}, {}, {}, {}));\n",
        fmt_f32(seg.start),
        fmt_f32(seg.unrolled_end()),
        fmt_f32(seg.fade_in_width.max(MIN_FADE)),
        fmt_f32(seg.fade_out_width.max(MIN_FADE)),
        seg.wraps()
    )
}

fn border_main(style: &BorderStyle, radii: CornerRadii) -> String {
    let thickness = fmt_f32(style.thickness);
    let segments: String = style.segments.iter().map(segment_call).collect();
    format!(
        r#"half4 main(float2 p) {{
    float2 pos = localPoint(p);
    float d = sdShape(pos, box.zw, {radii});
    if (d < -{thickness} || d >= 0.0) {{
        return half4(0.0);
    }}
    float band = smoothstep(-{thickness}, -{thickness} + 2.0, d) * smoothstep(1.0, -1.0, d);
    float t = perimeterAngle(pos);
    float segment = 0.0;
{segments}    if (segment < {floor}) {{
        return half4(0.0);
    }}
    float a = clamp(band * segment * {opacity}, 0.0, 1.0);
    return half4(a, a, a, a);
}}
"#,
        radii = float4(radii.to_array()),
        thickness = thickness,
        segments = segments,
        floor = fmt_f32(style.noise_floor),
        opacity = fmt_f32(style.opacity),
    )
}

fn glass_main(palette: &GlassPalette, radii: CornerRadii) -> String {
    let coverage = if palette.antialias {
        "1.0 - smoothstep(-2.0, 0.5, d)"
    } else {
        "1.0"
    };
    format!(
        r#"half4 main(float2 p) {{
    float2 pos = localPoint(p);
    float d = sdShape(pos, box.zw, {radii});
    if (d > 0.0) {{
        return half4(0.0);
    }}
    float t = perimeterAngle(pos);
    float centerFactor = clamp(-d / max(radius, 1.0), 0.0, 1.0);
    float edgePattern = sin((t + {phase}) * 6.283185307179586 * {frequency}) * 0.5 + 0.5;
    float3 edge = mix({edge_a}, {edge_b}, edgePattern);
    float3 color = mix(edge, {center}, centerFactor);
    float a = {coverage};
    return half4(half3(color * a), half(a));
}}
"#,
        radii = float4(radii.to_array()),
        phase = fmt_f32(palette.pattern_phase),
        frequency = fmt_f32(palette.pattern_frequency),
        edge_a = float3(palette.edge_primary),
        edge_b = float3(palette.edge_secondary),
        center = float3(palette.center),
        coverage = coverage,
    )
}
