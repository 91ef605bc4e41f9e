//! Pipeline configuration.
//!
//! Configuration is plain data with serde derives so it can be loaded from a
//! TOML file:
//!
//! ```toml
//! facing = "front"
//! preset = "1280x720"
//! torch_level = 0.5
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::orientation::CameraFacing;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Capture quality preset requested from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CapturePreset {
    #[serde(rename = "photo")]
    Photo,
    #[serde(rename = "high")]
    High,
    #[default]
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "320x240")]
    Res320x240,
    #[serde(rename = "352x288")]
    Res352x288,
    #[serde(rename = "640x480")]
    Res640x480,
    #[serde(rename = "960x540")]
    Res960x540,
    #[serde(rename = "1280x720")]
    Res1280x720,
    #[serde(rename = "iframe-960x540")]
    IFrame960x540,
    #[serde(rename = "iframe-1280x720")]
    IFrame1280x720,
}

impl CapturePreset {
    /// Frame size named by the preset, if it names one.
    ///
    /// Quality presets (photo, high, medium, low) depend on the device.
    pub fn nominal_size(self) -> Option<(u32, u32)> {
        match self {
            CapturePreset::Photo
            | CapturePreset::High
            | CapturePreset::Medium
            | CapturePreset::Low => None,
            CapturePreset::Res320x240 => Some((320, 240)),
            CapturePreset::Res352x288 => Some((352, 288)),
            CapturePreset::Res640x480 => Some((640, 480)),
            CapturePreset::Res960x540 | CapturePreset::IFrame960x540 => Some((960, 540)),
            CapturePreset::Res1280x720 | CapturePreset::IFrame1280x720 => Some((1280, 720)),
        }
    }
}

/// Settings the pipeline starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Camera to open on start.
    pub facing: CameraFacing,
    /// Capture preset to request.
    pub preset: CapturePreset,
    /// Torch level used when toggling the torch on (0 < level <= 1).
    pub torch_level: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            facing: CameraFacing::Back,
            preset: CapturePreset::Medium,
            torch_level: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.torch_level > 0.0 && self.torch_level <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "torch_level must be in (0, 1], got {}",
                self.torch_level
            )));
        }
        Ok(())
    }
}
