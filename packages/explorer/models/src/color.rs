//! Map fill colors and the choropleth color ramp.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{value}': expected rgba(r,g,b,a), rgb(r,g,b), or #rrggbb")]
pub struct InvalidColorError {
    /// The rejected input.
    pub value: String,
}

/// An RGBA color with 8-bit channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Linearly interpolates from `self` (at `t = 0`) to `other` (at `t = 1`).
    ///
    /// `t` is clamped to `[0, 1]` and each channel is rounded to the nearest
    /// integer.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
            a: (other.a - self.a).mul_add(t, self.a),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let value = (f64::from(to) - f64::from(from)).mul_add(t, f64::from(from));
    value.round().clamp(0.0, 255.0) as u8
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = InvalidColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidColorError {
            value: s.to_string(),
        };
        let value = s.trim();

        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(err());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
            return Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, 1.0));
        }

        let (body, expects_alpha) = if let Some(rest) = value.strip_prefix("rgba(") {
            (rest.strip_suffix(')').ok_or_else(err)?, true)
        } else if let Some(rest) = value.strip_prefix("rgb(") {
            (rest.strip_suffix(')').ok_or_else(err)?, false)
        } else {
            return Err(err());
        };

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if expects_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(err());
        }

        let channel = |p: &str| p.parse::<u8>().map_err(|_| err());
        let a = if expects_alpha {
            let a: f64 = parts[3].parse().map_err(|_| err())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(err());
            }
            a
        } else {
            1.0
        };

        Ok(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            a,
        ))
    }
}

impl TryFrom<String> for Rgba {
    type Error = InvalidColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// Endpoint colors for the choropleth, plus the fixed non-ramp colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ColorRamp {
    /// Fill at intensity 0 (the region with the lowest total).
    pub low: Rgba,
    /// Fill at intensity 1 (the region with the highest total).
    pub high: Rgba,
    /// Fill for regions the dataset does not cover.
    pub no_data: Rgba,
    /// Outline for hovered and pinned regions.
    pub highlight: Rgba,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            low: Rgba::new(255, 245, 245, 0.7),
            high: Rgba::new(255, 45, 0, 0.7),
            no_data: Rgba::new(255, 255, 255, 0.5),
            highlight: Rgba::new(0xe6, 0x39, 0x46, 1.0),
        }
    }
}

impl ColorRamp {
    /// Fill color at `ratio` along the ramp.
    #[must_use]
    pub fn at(&self, ratio: f64) -> Rgba {
        self.low.lerp(self.high, ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgba() {
        let c: Rgba = "rgba(255, 245, 245, 0.7)".parse().unwrap();
        assert_eq!(c, Rgba::new(255, 245, 245, 0.7));
    }

    #[test]
    fn parses_rgb_and_hex() {
        assert_eq!(
            "rgb(1,2,3)".parse::<Rgba>().unwrap(),
            Rgba::new(1, 2, 3, 1.0)
        );
        assert_eq!(
            "#e63946".parse::<Rgba>().unwrap(),
            Rgba::new(0xe6, 0x39, 0x46, 1.0)
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("rgba(1,2,3)".parse::<Rgba>().is_err());
        assert!("rgb(256,0,0)".parse::<Rgba>().is_err());
        assert!("rgba(1,2,3,1.5)".parse::<Rgba>().is_err());
        assert!("#e6394".parse::<Rgba>().is_err());
        assert!("red".parse::<Rgba>().is_err());
    }

    #[test]
    fn display_matches_paint_expression_format() {
        assert_eq!(Rgba::new(255, 45, 0, 0.7).to_string(), "rgba(255,45,0,0.7)");
    }

    #[test]
    fn default_ramp_endpoints() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.at(0.0), ramp.low);
        assert_eq!(ramp.at(1.0), ramp.high);
        // g = 245 - 0.5 * 200, b = 245 - 0.5 * 245 (122.5 rounds away from zero)
        let mid = ramp.at(0.5);
        assert_eq!((mid.r, mid.g, mid.b), (255, 145, 123));
    }

    #[test]
    fn lerp_clamps_ratio() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.at(-0.25), ramp.low);
        assert_eq!(ramp.at(1.000_001), ramp.high);
        assert_eq!(ramp.at(f64::NAN), ramp.low);
    }

    #[test]
    fn ramp_deserializes_partial_overrides() {
        let ramp: ColorRamp = serde_json::from_str(r##"{"high": "#000000"}"##).unwrap();
        assert_eq!(ramp.high, Rgba::new(0, 0, 0, 1.0));
        assert_eq!(ramp.low, ColorRamp::default().low);
    }
}
