//! Configuration: colors for the generated objects and dialog defaults.
//!
//! Read from TOML; every field is optional.
//!
//! ```toml
//! [style]
//! cut_face_color = { r = 0.55, g = 0.0, b = 0.0 }
//! cube_transparency = 85
//!
//! [defaults]
//! size = 2000
//! reversed = true
//! ```

use std::path::Path;

use cutview_ir::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cube::BoxSize;

/// Errors loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid configuration TOML.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Colors and transparency of the generated objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Marker for faces lying on the cutting plane.
    pub cut_face_color: Color,
    /// Color of every other face of a cut result.
    pub base_color: Color,
    /// Tint of the cut boxes.
    pub cube_color: Color,
    /// Transparency of the cut boxes, 0 (opaque) to 100.
    pub cube_transparency: u8,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            cut_face_color: Color::new(0.55, 0.0, 0.0),
            base_color: Color::new(0.8, 0.8, 0.8),
            cube_color: Color::new(1.0, 0.6, 0.0),
            cube_transparency: 80,
        }
    }
}

/// Answers the dialogs start from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Preselected box size.
    pub size: BoxSize,
    /// Mark faces whose normal opposes the plane normal instead.
    pub reversed: bool,
}

/// Cut-view configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CutviewConfig {
    /// Colors.
    pub style: Style,
    /// Dialog defaults.
    pub defaults: Defaults,
}

impl CutviewConfig {
    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = CutviewConfig::from_toml("").unwrap();
        assert_eq!(config, CutviewConfig::default());
        assert_eq!(config.defaults.size, BoxSize::S1000);
        assert!(!config.defaults.reversed);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = CutviewConfig::from_toml(
            r#"
            [style]
            cut_face_color = { r = 1.0, g = 0.0, b = 0.0 }

            [defaults]
            size = 3000
            reversed = true
            "#,
        )
        .unwrap();
        assert_eq!(config.style.cut_face_color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(config.style.base_color, Style::default().base_color);
        assert_eq!(config.defaults.size, BoxSize::S3000);
        assert!(config.defaults.reversed);
    }

    #[test]
    fn unsupported_size_is_rejected() {
        let err = CutviewConfig::from_toml("[defaults]\nsize = 1234\n").unwrap_err();
        assert!(err.to_string().contains("1234"));
    }
}
