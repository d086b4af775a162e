//! Label plot configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! max_plotted = 250
//! pixel_margin = 3.0
//!
//! [theme.selected_line]
//! r = 1.0
//! g = 0.2
//! b = 0.2
//! a = 1.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::Theme;
use crate::view::Range;

/// Configuration for a [`LabelPlot`](crate::plot::LabelPlot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPlotConfig {
    /// Maximum number of labels rendered for one view range.
    pub max_plotted: usize,
    /// Pixel slack around a label when hit testing double clicks.
    pub pixel_margin: f32,
    /// Base text size in pixels. Label names are drawn at twice this size.
    pub text_size: f32,
    /// Boundary line width in pixels.
    pub line_width: f32,
    /// Fixed vertical range of the plot.
    pub y_range: Range,
    /// Colors.
    pub theme: Theme,
}

impl Default for LabelPlotConfig {
    fn default() -> Self {
        Self {
            max_plotted: 100,
            pixel_margin: 2.0,
            text_size: 12.0,
            line_width: 1.0,
            y_range: Range::new(0.0, 1.0),
            theme: Theme::default(),
        }
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML for this configuration.
    #[error("Invalid config: {source}")]
    ParseToml { source: toml::de::Error },
}

impl LabelPlotConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml { source })
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded label plot config from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
