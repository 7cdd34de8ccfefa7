use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::style::TokenDefs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    pub center_x: f32,
    pub center_y: f32,
    /// Ring radius used when several roots share the center.
    pub multi_root_radius: f32,
    /// Multiplier on the parent level's average node extent; the size-based
    /// minimum ring step.
    pub level_gap_multiplier: f32,
    /// Per-node angular padding added to the required ring circumference.
    pub sibling_padding: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            multi_root_radius: 80.0,
            level_gap_multiplier: 2.0,
            sibling_padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    /// Column advance as a multiple of the previous column's average width.
    pub column_gap_multiplier: f32,
    /// Vertical gap between stacked nodes in a column.
    pub row_padding: f32,
}

impl Default for HorizontalConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            column_gap_multiplier: 1.8,
            row_padding: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub radial: RadialConfig,
    pub horizontal: HorizontalConfig,
}

/// Reads a layout config file, JSON first with a JSON5 fallback for relaxed
/// hand-written files. `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents) {
        Ok(config) => Ok(config),
        Err(_) => Ok(json5::from_str(&contents)?),
    }
}

/// Reads a token dictionary file, same JSON/JSON5 handling as [`load_config`].
pub fn load_token_defs(path: &Path) -> anyhow::Result<TokenDefs> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents) {
        Ok(defs) => Ok(defs),
        Err(_) => Ok(json5::from_str(&contents)?),
    }
}
