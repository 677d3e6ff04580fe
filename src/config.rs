//! Config module.
//! Render settings for the heatmap canvas (cell size, colour scale, legend layout).
//! Uses serde for JSON deserialisation; every field has a default so a
//! config file only needs the keys it changes. CLI flags override the file.

use crate::colormap::Colormap;
use crate::error::{RenderError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Largest accepted `cell_size`, `legend_width` and `margin`, in pixels.
pub const MAX_PIXEL_SETTING: u32 = 1024;
/// Largest accepted `font_size`.
pub const MAX_FONT_SIZE: f32 = 256.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length in pixels of one grid cell.
    pub cell_size: u32,
    pub colormap: Colormap,
    /// Draw the last grid row at the top. Puts rank 8 on top for boards
    /// indexed `rank * 8 + file`.
    pub flip_vertical: bool,
    /// Legend label height in pixels.
    pub font_size: f32,
    /// Width of the colour bar in pixels.
    pub legend_width: u32,
    /// Blank border around the whole image.
    pub margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 48,
            colormap: Colormap::Plasma,
            flip_vertical: false,
            font_size: 14.0,
            legend_width: 24,
            margin: 16,
        }
    }
}

impl RenderConfig {
    /// Loads and validates a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 || self.cell_size > MAX_PIXEL_SETTING {
            return Err(RenderError::InvalidConfig(format!(
                "cell_size must be between 1 and {}, got {}",
                MAX_PIXEL_SETTING, self.cell_size
            )));
        }
        for (name, value) in [("legend_width", self.legend_width), ("margin", self.margin)] {
            if value > MAX_PIXEL_SETTING {
                return Err(RenderError::InvalidConfig(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_PIXEL_SETTING, value
                )));
            }
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0 && self.font_size <= MAX_FONT_SIZE)
        {
            return Err(RenderError::InvalidConfig(format!(
                "font_size must be in (0, {}], got {}",
                MAX_FONT_SIZE, self.font_size
            )));
        }
        Ok(())
    }
}
