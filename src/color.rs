use crate::config::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create an opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// The alpha channel as a 0..1 factor.
    pub fn alpha_factor(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Apply a brightness factor against a black background.
    ///
    /// The color's own alpha is folded in, so the result is always opaque.
    pub fn scale_brightness(&self, factor: f32) -> Color {
        let factor = (factor * self.alpha_factor()).clamp(0.0, 1.0);
        Color::new(
            (self.r as f32 * factor).round() as u8,
            (self.g as f32 * factor).round() as u8,
            (self.b as f32 * factor).round() as u8,
        )
    }

    /// Interpolate between two colors.
    pub fn lerp(&self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    fn parse_hex(input: &str) -> Option<Color> {
        let hex = input.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
        match hex.len() {
            6 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?).with_alpha(channel(6)?)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        NeonPreset::Green.color()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(preset) = NeonPreset::from_str(input) {
            return Ok(preset.color());
        }
        Self::parse_hex(input).ok_or_else(|| ConfigError::InvalidColor(input.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Color> for crossterm::style::Color {
    fn from(color: Color) -> Self {
        crossterm::style::Color::Rgb { r: color.r, g: color.g, b: color.b }
    }
}

/// The neon palette offered as named colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NeonPreset {
    Green,
    Pink,
    Blue,
    Yellow,
    White,
    Red,
    Orange,
}

impl NeonPreset {
    pub fn color(&self) -> Color {
        match self {
            Self::Green => Color::new(0x00, 0xFF, 0x85),
            Self::Pink => Color::new(0xFF, 0x00, 0xFF),
            Self::Blue => Color::new(0x00, 0xE5, 0xFF),
            Self::Yellow => Color::new(0xFF, 0xEA, 0x00),
            Self::White => Color::new(0xFF, 0xFF, 0xFF),
            Self::Red => Color::new(0xFF, 0x00, 0x00),
            Self::Orange => Color::new(0xFF, 0x98, 0x00),
        }
    }

    /// All presets, in palette order.
    pub fn all() -> impl Iterator<Item = NeonPreset> {
        Self::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::preset("pink", Color::new(255, 0, 255))]
    #[case::preset_any_case("GREEN", Color::new(0, 255, 0x85))]
    #[case::hex("#102030", Color::new(0x10, 0x20, 0x30))]
    #[case::hex_alpha("#10203080", Color::new(0x10, 0x20, 0x30).with_alpha(0x80))]
    #[case::padded("  #ffffff ", Color::new(255, 255, 255))]
    fn parse(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(input.parse::<Color>().expect("parse failed"), expected);
    }

    #[rstest]
    #[case::no_hash("102030")]
    #[case::short("#123")]
    #[case::not_hex("#zzzzzz")]
    #[case::unknown_name("mauve")]
    #[case::multibyte("#ééé")]
    fn parse_invalid(#[case] input: &str) {
        assert!(matches!(input.parse::<Color>(), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn display() {
        assert_eq!(Color::new(0, 255, 0x85).to_string(), "#00FF85");
        assert_eq!(Color::new(1, 2, 3).with_alpha(4).to_string(), "#01020304");
    }

    #[test]
    fn scale_brightness() {
        let color = Color::new(200, 100, 50);
        assert_eq!(color.scale_brightness(0.5), Color::new(100, 50, 25));
        assert_eq!(color.scale_brightness(0.0), Color::BLACK);
        assert_eq!(color.scale_brightness(3.0), color);
    }

    #[test]
    fn scale_brightness_folds_alpha() {
        let color = Color::new(200, 100, 50).with_alpha(0);
        assert_eq!(color.scale_brightness(1.0), Color::BLACK);
    }

    #[test]
    fn lerp() {
        let mid = Color::BLACK.lerp(Color::new(255, 255, 255), 0.5);
        assert_eq!(mid, Color::new(128, 128, 128));
        assert_eq!(Color::BLACK.lerp(Color::new(10, 10, 10), 2.0), Color::new(10, 10, 10));
    }

    #[test]
    fn presets_round_trip_through_names() {
        for preset in NeonPreset::all() {
            let parsed: Color = preset.to_string().parse().expect("preset name");
            assert_eq!(parsed, preset.color());
        }
    }
}
