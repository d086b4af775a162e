//! Colors used when drawing label regions.

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Visual theme for label plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Plot background.
    pub background: Color,
    /// Fill of a label region.
    pub region_fill: Color,
    /// Boundary lines of an unselected label.
    pub default_line: Color,
    /// Boundary lines of a selected label.
    pub selected_line: Color,
    /// Shared boundary right after a selected label.
    pub adjacent_line: Color,
    /// Label text.
    pub text: Color,
}

impl Theme {
    /// Create the default (dark) theme.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::new(0.07, 0.07, 0.08, 1.0),
            region_fill: Color::new(0.0, 0.0, 1.0, 0.2),
            default_line: Color::new(0.2, 0.2, 0.9, 1.0),
            selected_line: Color::RED,
            adjacent_line: Color::YELLOW,
            text: Color::WHITE,
        }
    }
}
