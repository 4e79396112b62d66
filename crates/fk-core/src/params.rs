//! Design parameter table and RON persistence
//!
//! All lengths are in centimetres unless the field name ends in `_in`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{STD_THICKNESS_IN, in_to_cm};

/// Base parameters of the whole design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignParams {
    /// Nominal thickness of the stock lumber, in inches
    pub std_thickness_in: f32,
    /// Table parameters
    pub table: TableParams,
    /// Wall shelf parameters
    pub wall_shelf: WallShelfParams,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            std_thickness_in: STD_THICKNESS_IN,
            table: TableParams::default(),
            wall_shelf: WallShelfParams::default(),
        }
    }
}

/// Table parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableParams {
    pub depth: f32,
    pub length: f32,
    pub height: f32,
    pub top_thickness: f32,
    /// Leg cross-section; `None` uses the standard stock thickness
    pub leg_width: Option<f32>,
    /// Allowance for the floor glides under each leg
    ///
    /// Defaults to 0.08 so the base table gets 83.92 cm legs. Set it to zero
    /// for legs that run the full height below the top.
    pub leg_glide: f32,
    pub panel_height: f32,
    /// Drawer opening widths, left to right
    pub drawer_widths: Vec<f32>,
    pub drawer_height: f32,
}

impl Default for TableParams {
    fn default() -> Self {
        Self {
            depth: 60.0,
            length: 120.0,
            height: 86.0,
            top_thickness: 2.0,
            leg_width: None,
            leg_glide: 0.08,
            panel_height: 20.0,
            drawer_widths: vec![70.0, 35.0],
            drawer_height: 12.0,
        }
    }
}

/// Wall frame, shelf and bracket parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallShelfParams {
    /// Width of the frame boards, in inches
    pub board_width_in: f32,
    /// Height of the shelf top above the floor
    pub shelf_height: f32,
    pub shelf_depth: f32,
    pub shelf_thickness: f32,
    /// Frame height left above the shelf
    pub backboard_height: f32,
    pub bracket_height: f32,
    /// Distance of each bolt hole from the top/bottom of its bracket
    pub bolt_inset: f32,
    pub bolt_diameter: f32,
    /// Distance of each screw hole from the front/back of the shelf
    pub screw_inset: f32,
    pub screw_diameter: f32,
}

impl Default for WallShelfParams {
    fn default() -> Self {
        Self {
            board_width_in: 4.0,
            shelf_height: 185.0,
            shelf_depth: 25.0,
            shelf_thickness: 2.0,
            backboard_height: 15.0,
            bracket_height: in_to_cm(4.0),
            bolt_inset: in_to_cm(1.0),
            bolt_diameter: 0.9,
            screw_inset: 3.0,
            screw_diameter: 0.45,
        }
    }
}

impl DesignParams {
    /// Save parameters to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ParamsError::Io(e.to_string()))?;
        Ok(())
    }

    /// Serialize parameters to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ParamsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ParamsError::Serialize(e.to_string()))
    }

    /// Load parameters from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ParamsError::Io(e.to_string()))?;
        let params = Self::from_ron_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded design parameters");
        Ok(params)
    }

    /// Parse parameters from RON; missing fields take their defaults
    pub fn from_ron_str(content: &str) -> Result<Self, ParamsError> {
        ron::from_str(content).map_err(|e| ParamsError::Deserialize(e.to_string()))
    }
}

/// Parameter file errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}
