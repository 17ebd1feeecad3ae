mod file;

pub use file::{ConfigFile, PlayerOptions, SignDefaults};

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// The longest text a sign accepts, in characters.
pub const MAX_TEXT_CHARS: usize = 30;

/// Accepted font sizes, in points.
pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 50.0..=300.0;

/// Accepted speed factors.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.1..=2.0;

/// How the sign presents its text.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayMode {
    /// Text enters from the right edge and leaves past the left one.
    #[default]
    Scroll,

    /// Centered text flickering like a neon tube.
    Blink,
}

/// Everything the player needs to know about what to show.
///
/// A config is only ever built through validation, and it is never mutated: updates produce a new
/// config via [DisplayConfig::apply].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    text: String,
    color: Color,
    font_size_pt: f32,
    speed: f32,
    mode: DisplayMode,
}

impl DisplayConfig {
    pub fn new(
        text: impl Into<String>,
        color: Color,
        font_size_pt: f32,
        speed: f32,
        mode: DisplayMode,
    ) -> Result<Self, ConfigError> {
        let text = text.into();
        validate_text(&text)?;
        validate_range("font size", font_size_pt, &FONT_SIZE_RANGE)?;
        validate_range("speed", speed, &SPEED_RANGE)?;
        Ok(Self { text, color, font_size_pt, speed, mode })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn font_size_pt(&self) -> f32 {
        self.font_size_pt
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Produce a new config with the given update applied.
    pub fn apply(&self, update: SettingsUpdate) -> Result<Self, ConfigError> {
        debug!("applying settings update: {update:?}");
        let mut next = self.clone();
        match update {
            SettingsUpdate::Text(text) => {
                validate_text(&text)?;
                next.text = text;
            }
            SettingsUpdate::Color(color) => next.color = color,
            SettingsUpdate::FontSize(size) => {
                validate_range("font size", size, &FONT_SIZE_RANGE)?;
                next.font_size_pt = size;
            }
            SettingsUpdate::Speed(speed) => {
                validate_range("speed", speed, &SPEED_RANGE)?;
                next.speed = speed;
            }
            SettingsUpdate::Mode(mode) => next.mode = mode,
        };
        Ok(next)
    }

    /// Apply a sequence of updates, stopping at the first invalid one.
    pub fn apply_all<I>(&self, updates: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = SettingsUpdate>,
    {
        updates.into_iter().try_fold(self.clone(), |config, update| config.apply(update))
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            text: "I LOVE YOU".to_string(),
            color: Color::default(),
            font_size_pt: 100.0,
            speed: 0.5,
            mode: DisplayMode::Scroll,
        }
    }
}

/// A single change to a [DisplayConfig].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    Text(String),
    Color(Color),
    FontSize(f32),
    Speed(f32),
    Mode(DisplayMode),
}

fn validate_text(text: &str) -> Result<(), ConfigError> {
    let length = text.chars().count();
    if length == 0 {
        return Err(ConfigError::EmptyText);
    }
    if length > MAX_TEXT_CHARS {
        return Err(ConfigError::TextTooLong(length));
    }
    if text.chars().any(char::is_control) {
        return Err(ConfigError::ControlCharacters);
    }
    Ok(())
}

fn validate_range(name: &'static str, value: f32, range: &RangeInclusive<f32>) -> Result<(), ConfigError> {
    // NaN fails `contains`, so it lands here too
    if !range.contains(&value) {
        return Err(ConfigError::OutOfRange { name, value, min: *range.start(), max: *range.end() });
    }
    Ok(())
}

/// Errors that can occur when building a configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("text is {0} characters long, at most {max} are allowed", max = MAX_TEXT_CHARS)]
    TextTooLong(usize),

    #[error("text must be a single line without control characters")]
    ControlCharacters,

    #[error("{name} {value} is out of range, expected {min}..={max}")]
    OutOfRange { name: &'static str, value: f32, min: f32, max: f32 },

    #[error("invalid color '{0}': expected a preset name, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("fps must be between 1 and 240, got {0}")]
    InvalidFrameRate(u32),

    #[error("reading config file {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("parsing config file {path}: {source}")]
    Parse { path: String, source: serde_yaml::Error },
}
