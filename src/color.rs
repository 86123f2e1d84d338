use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("interpolation value {0} is outside [0, 1]")]
    OutOfRange(f32),
    #[error("gradient has no stops")]
    EmptyGradient,
    #[error("malformed hex color '{0}'")]
    BadHex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::BadHex(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::BadHex(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f32,
    pub color: Rgb,
}

impl GradientStop {
    pub const fn new(position: f32, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear interpolation over `stops` at `value`.
///
/// Stops are sorted by position before use, so callers may pass them in any
/// order. Values at or beyond the endpoint positions clamp to the endpoint
/// colors exactly; an exact hit on a duplicated position resolves to the
/// earlier stop in sorted order.
pub fn interpolate(stops: &[GradientStop], value: f32) -> Result<Rgb, ColorError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorError::OutOfRange(value));
    }

    let mut sorted = stops.to_vec();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Err(ColorError::EmptyGradient);
    };
    if value <= first.position {
        return Ok(first.color);
    }
    if value >= last.position {
        return Ok(last.color);
    }

    for pair in sorted.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo.position <= value && value <= hi.position {
            if hi.position <= lo.position {
                return Ok(lo.color);
            }
            let t = (value - lo.position) / (hi.position - lo.position);
            return Ok(mix(lo.color, hi.color, t));
        }
    }

    // Unreachable given the clamping above, but the compiler cannot see that.
    Ok(last.color)
}

fn mix(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb::new(lerp(from.r, to.r), lerp(from.g, to.g), lerp(from.b, to.b))
}
