//! RGBA colors with the CSS-style notations used in style files.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in [0, 1]
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0.0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, ignoring alpha
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Same color with its alpha multiplied by `factor`
    #[must_use]
    pub fn fade(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

fn parse_channel(text: &str, source: &str) -> Result<u8> {
    text.trim()
        .parse::<u8>()
        .map_err(|_| Error::InvalidInput(format!("Invalid color channel '{text}' in '{source}'")))
}

fn parse_alpha(text: &str, source: &str) -> Result<f64> {
    let alpha = text
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("Invalid alpha '{text}' in '{source}'")))?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidInput(format!("Alpha must be between 0 and 1 in '{source}'")));
    }
    Ok(alpha)
}

fn parse_hex_pair(text: &str, source: &str) -> Result<u8> {
    u8::from_str_radix(text, 16).map_err(|_| Error::InvalidInput(format!("Invalid hex color '{source}'")))
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();

        if let Some(hex) = text.strip_prefix('#') {
            if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
                return Err(Error::InvalidInput(format!("Invalid hex color '{s}'")));
            }
            let r = parse_hex_pair(&hex[0..2], s)?;
            let g = parse_hex_pair(&hex[2..4], s)?;
            let b = parse_hex_pair(&hex[4..6], s)?;
            let a = if hex.len() == 8 {
                f64::from(parse_hex_pair(&hex[6..8], s)?) / 255.0
            } else {
                1.0
            };
            return Ok(Self { r, g, b, a });
        }

        let (body, has_alpha) = if let Some(body) = text.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = text.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(Error::InvalidInput(format!("Unsupported color notation '{s}'")));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| Error::InvalidInput(format!("Unterminated color '{s}'")))?;
        let parts: Vec<&str> = body.split(',').collect();

        match (parts.as_slice(), has_alpha) {
            ([r, g, b], false) => Ok(Self::rgb(parse_channel(r, s)?, parse_channel(g, s)?, parse_channel(b, s)?)),
            ([r, g, b, a], true) => Ok(Self::rgba(
                parse_channel(r, s)?,
                parse_channel(g, s)?,
                parse_channel(b, s)?,
                parse_alpha(a, s)?,
            )),
            _ => Err(Error::InvalidInput(format!("Wrong number of color components in '{s}'"))),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.a - 1.0).abs() < f64::EPSILON {
            write!(f, "{}", self.hex())
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}
