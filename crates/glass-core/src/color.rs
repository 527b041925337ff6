use crate::errors::{GlassError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Represents a RGBA color in float format (0.0 - 1.0), not premultiplied.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// From 8-bit channels and a float alpha, the way CSS `rgba()` spells it.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a.clamp(0.0, 1.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let m = |a: f32, b: f32| a + (b - a) * t;
        Color::new(
            m(self.r, other.r),
            m(self.g, other.g),
            m(self.b, other.b),
            m(self.a, other.a),
        )
    }

    /// Quantizes to straight (non-premultiplied) 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl FromStr for Color {
    type Err = GlassError;

    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid(s));
        }
        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| invalid(s))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid(s));
        match parts.as_slice() {
            [r, g, b] => Ok(Color::from_rgba8(channel(r)?, channel(g)?, channel(b)?, 1.0)),
            [r, g, b, a] => {
                let a: f32 = a.parse().map_err(|_| invalid(s))?;
                Ok(Color::from_rgba8(channel(r)?, channel(g)?, channel(b)?, a))
            }
            _ => Err(invalid(s)),
        }
    }
}

fn invalid(s: &str) -> GlassError {
    GlassError::InvalidConfig(format!("unrecognized color '{}'", s))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
            Some(Color::from_rgba8(nib(0)? * 17, nib(1)? * 17, nib(2)? * 17, 1.0))
        }
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Color::from_rgba8(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Floats {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

fn opaque() -> f32 {
    1.0
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            ColorRepr::Floats { r, g, b, a } => Ok(Color::new(r, g, b, a)),
        }
    }
}
