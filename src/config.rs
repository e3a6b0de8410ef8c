//! Configuration parsing and management for FaceFrame

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, FaceframeError};
use crate::eyewear::FrameVariant;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub renderer: RendererConfig,
    pub eyewear: EyewearConfig,
    pub fit: FitSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            renderer: RendererConfig::default(),
            eyewear: EyewearConfig::default(),
            fit: FitSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FaceframeError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> Result<Self, FaceframeError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, FaceframeError> {
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), FaceframeError> {
        if self.detector.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        if self.detector.left_eye_index == self.detector.right_eye_index {
            return Err(ConfigError::InvalidValue {
                field: "detector.right_eye_index".to_string(),
                message: "Left and right eye indices must differ".to_string(),
            }
            .into());
        }

        if self.renderer.viewport_width == 0 || self.renderer.viewport_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "renderer.viewport_width/height".to_string(),
                message: "Viewport dimensions must be positive".to_string(),
            }
            .into());
        }

        self.fit.validate()?;

        Ok(())
    }
}

/// Landmark detector intake configuration.
///
/// The eye/nose indices select landmarks out of the detector's per-frame
/// array. The defaults follow the MediaPipe FaceMesh numbering (left eye
/// outer corner 33, right eye outer corner 263, nose bridge 9); a detector
/// with a different anatomical numbering only needs new indices here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// UDP port to receive landmark packets on
    pub port: u16,
    /// Listen address for the UDP socket
    pub listen_address: String,
    /// Index of the left eye outer corner landmark
    pub left_eye_index: usize,
    /// Index of the right eye outer corner landmark
    pub right_eye_index: usize,
    /// Index of the nose bridge landmark
    pub nose_bridge_index: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            port: 12400,
            listen_address: "127.0.0.1".to_string(),
            left_eye_index: 33,
            right_eye_index: 263,
            nose_bridge_index: 9,
        }
    }
}

/// External renderer bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Address the renderer process listens on for scene mutations
    pub address: String,
    /// Render canvas width in pixels
    pub viewport_width: u32,
    /// Render canvas height in pixels
    pub viewport_height: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:12401".to_string(),
            viewport_width: 640,
            viewport_height: 480,
        }
    }
}

/// Frame model asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EyewearConfig {
    /// Path to the glTF model used by the asset-backed variant
    pub model_path: PathBuf,
}

impl Default for EyewearConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("assets/frames.gltf"),
        }
    }
}

/// User-tunable fit settings.
///
/// These persist as session state until explicitly changed; the pose itself
/// is recomputed from scratch every frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSettings {
    /// Active frame style
    pub variant: FrameVariant,
    /// Uniform size multiplier
    pub scale: f32,
    /// Width multiplier (currently applied uniformly, see pose module)
    pub width: f32,
    /// Vertical nudge in detector-normalized units
    pub height_offset: f32,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            variant: FrameVariant::Classic,
            scale: 1.0,
            width: 1.0,
            height_offset: 0.0,
        }
    }
}

impl FitSettings {
    /// Validate the fit settings
    pub fn validate(&self) -> Result<(), FaceframeError> {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "fit.scale".to_string(),
                message: "Scale must be positive and finite".to_string(),
            }
            .into());
        }

        if self.width <= 0.0 || !self.width.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "fit.width".to_string(),
                message: "Width must be positive and finite".to_string(),
            }
            .into());
        }

        if !self.height_offset.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "fit.height_offset".to_string(),
                message: "Height offset must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.detector.left_eye_index, 33);
        assert_eq!(config.detector.right_eye_index, 263);
        assert_eq!(config.detector.nose_bridge_index, 9);
        assert_eq!(config.fit.variant, FrameVariant::Classic);
        assert_eq!(config.fit.scale, 1.0);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [detector]
            port = 9000
            left_eye_index = 130
            right_eye_index = 359

            [fit]
            variant = "vintage"
            scale = 1.2
            height_offset = -3.0
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.detector.port, 9000);
        assert_eq!(config.detector.left_eye_index, 130);
        assert_eq!(config.detector.right_eye_index, 359);
        assert_eq!(config.fit.variant, FrameVariant::Vintage);
        assert_eq!(config.fit.scale, 1.2);
        assert_eq!(config.fit.height_offset, -3.0);
        // Untouched sections keep their defaults
        assert_eq!(config.renderer.viewport_width, 640);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let mut config = Config::default();
        config.fit.scale = 0.0;
        assert!(config.validate().is_err());

        config.fit.scale = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_eye_indices_rejected() {
        let mut config = Config::default();
        config.detector.right_eye_index = config.detector.left_eye_index;
        assert!(config.validate().is_err());
    }
}
