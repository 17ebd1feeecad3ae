use super::{ConfigError, DisplayMode, SettingsUpdate};
use crate::color::Color;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEFAULT_FPS: u32 = 60;
const MAX_FPS: u32 = 240;

/// The on-disk configuration.
///
/// Every field is optional: anything missing keeps its built-in default, and command line flags
/// override whatever is set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ConfigFile {
    /// Defaults for what the sign shows.
    pub sign: SignDefaults,

    /// How the player behaves.
    pub player: PlayerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SignDefaults {
    pub text: Option<String>,
    pub color: Option<Color>,
    pub size: Option<f32>,
    pub speed: Option<f32>,
    pub mode: Option<DisplayMode>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct PlayerOptions {
    /// The FIGlet font the sign is drawn with.
    pub font: String,

    /// Whether to show the power-on splash before the sign.
    pub splash: bool,

    /// Frames drawn per second.
    pub fps: u32,
}

impl PlayerOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::InvalidFrameRate(self.fps));
        }
        Ok(())
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self { font: "standard".to_string(), splash: true, fps: DEFAULT_FPS }
    }
}

impl ConfigFile {
    /// Load the config file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display_path = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io { path: display_path.clone(), source })?;
        let config = Self::parse(&contents).map_err(|source| ConfigError::Parse { path: display_path, source })?;
        config.player.validate()?;
        info!("loaded config file {}", path.display());
        Ok(config)
    }

    /// Load the config file from the default location, if there is one.
    pub fn load_default() -> Result<Self, ConfigError> {
        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        match Self::load(&path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                debug!("no config file at {}", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// The platform specific location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bling").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        // an empty file is a valid, empty, config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// The sign defaults in this file, as updates to apply on top of the built-in defaults.
    pub fn sign_updates(&self) -> Vec<SettingsUpdate> {
        let sign = &self.sign;
        let mut updates = Vec::new();
        if let Some(text) = &sign.text {
            updates.push(SettingsUpdate::Text(text.clone()));
        }
        if let Some(color) = sign.color {
            updates.push(SettingsUpdate::Color(color));
        }
        if let Some(size) = sign.size {
            updates.push(SettingsUpdate::FontSize(size));
        }
        if let Some(speed) = sign.speed {
            updates.push(SettingsUpdate::Speed(speed));
        }
        if let Some(mode) = sign.mode {
            updates.push(SettingsUpdate::Mode(mode));
        }
        updates
    }
}
