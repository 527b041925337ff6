//! Scalar helpers with the same semantics as their SkSL built-in namesakes.
//!
//! The CPU evaluators and the generated shaders must agree, so everything here
//! follows the GLSL definitions rather than the nicer Rust ones
//! (e.g. `smoothstep` accepts reversed edges).

use std::f32::consts::TAU;

/// Hermite interpolation between `edge0` and `edge1`.
///
/// Reversed edges produce a falling curve, as in GLSL. Equal edges degrade to
/// a step at `edge0`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation, `a` at `t = 0`.
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wraps any angle fraction into `[0, 1)`.
pub fn wrap_unit(t: f32) -> f32 {
    let w = t - t.floor();
    // -1e-9 rounds up to exactly 1.0 in f32
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Polar angle of `(x, y)` as a fraction of a full turn, in `[0, 1)`.
///
/// The origin has no direction; it maps to 0.
pub fn turn_fraction(x: f32, y: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    let mut t = y.atan2(x) / TAU;
    if t < 0.0 {
        t += 1.0;
    }
    wrap_unit(t)
}

/// Replaces NaN and infinities with zero.
pub fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
