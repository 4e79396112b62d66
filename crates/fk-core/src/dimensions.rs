//! Derived dimensions
//!
//! [`Dimensions::resolve`] turns a [`DesignParams`] table into every length
//! the part builders need. It is a pure function: nothing is clamped, and the
//! first non-positive value is reported by name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::in_to_cm;
use crate::params::DesignParams;

/// Dimension resolution errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimensionError {
    #[error("Dimension '{name}' must be positive, got {value}")]
    NonPositive { name: String, value: f32 },
}

/// Every length used to build the design, in centimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    // Stock
    pub std_thickness: f32,
    pub panel_thickness: f32,

    // Table
    pub table_depth: f32,
    pub table_length: f32,
    pub table_height: f32,
    pub top_thickness: f32,
    pub leg_width: f32,
    pub leg_length: f32,
    pub panel_height: f32,
    pub side_panel_length: f32,
    pub front_panel_length: f32,

    // Drawers
    pub drawer_widths: Vec<f32>,
    pub drawer_height: f32,
    /// Frontage left over once every drawer opening is cut
    pub front_panel_excess: f32,
    /// Gap before, between and after drawer openings
    pub drawer_border_width: f32,
    /// Opening centres along the face frame, relative to its centre
    pub drawer_centers: Vec<f32>,
    /// Material above and below each opening
    pub drawer_margin: f32,

    // Wall frame
    pub board_width: f32,
    pub board_depth: f32,
    pub wall_frame_height: f32,
    pub rail_length: f32,
    pub backboard_height: f32,
    /// Height of the table mount point above the bottom of a vertical board
    pub table_mount_height: f32,

    // Shelf and brackets
    pub shelf_height: f32,
    pub shelf_depth: f32,
    pub shelf_length: f32,
    pub shelf_thickness: f32,
    pub bracket_height: f32,
    /// Top of the brackets in vertical-board coordinates
    pub bracket_top: f32,
    /// Board height left under the brackets
    pub bracket_clearance: f32,
    pub bolt_inset: f32,
    pub bolt_upper_z: f32,
    pub bolt_lower_z: f32,
    pub bolt_diameter: f32,
    pub screw_offset_x: f32,
    pub screw_offset_y: f32,
    pub screw_diameter: f32,
}

/// Reject zero, negative and non-finite values
fn positive(name: &str, value: f32) -> Result<f32, DimensionError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DimensionError::NonPositive {
            name: name.to_string(),
            value,
        })
    }
}

/// Lay drawer openings out left to right with equal borders
///
/// Returns the opening centres relative to the middle of a panel of
/// length `front`.
pub fn drawer_centers(front: f32, widths: &[f32], border: f32) -> Vec<f32> {
    let mut x = -front / 2.0;
    let mut centers = Vec::with_capacity(widths.len());
    for width in widths {
        x += border + width / 2.0;
        centers.push(x);
        x += width / 2.0;
    }
    centers
}

impl Dimensions {
    /// Resolve every derived dimension from the base parameters
    pub fn resolve(params: &DesignParams) -> Result<Self, DimensionError> {
        let table = &params.table;
        let shelf = &params.wall_shelf;

        let std_thickness = positive("std_thickness", in_to_cm(params.std_thickness_in))?;
        let table_depth = positive("table.depth", table.depth)?;
        let table_length = positive("table.length", table.length)?;
        let table_height = positive("table.height", table.height)?;
        let top_thickness = positive("table.top_thickness", table.top_thickness)?;
        let leg_width = table.leg_width.unwrap_or(std_thickness);
        let leg_width = positive("table.leg_width", leg_width)?;
        let panel_height = positive("table.panel_height", table.panel_height)?;
        let drawer_height = positive("table.drawer_height", table.drawer_height)?;
        if table.leg_glide < 0.0 || !table.leg_glide.is_finite() {
            return Err(DimensionError::NonPositive {
                name: "table.leg_glide".to_string(),
                value: table.leg_glide,
            });
        }
        for (i, width) in table.drawer_widths.iter().enumerate() {
            positive(&format!("table.drawer_widths[{}]", i), *width)?;
        }

        let panel_thickness = std_thickness;
        let side_panel_length = positive("side_panel_length", table_depth - 2.0 * leg_width)?;
        let front_panel_length = positive("front_panel_length", table_length - 2.0 * leg_width)?;
        let front_panel_excess = positive(
            "front_panel_excess",
            front_panel_length - table.drawer_widths.iter().sum::<f32>(),
        )?;
        let drawer_border_width = front_panel_excess / (table.drawer_widths.len() + 1) as f32;
        let drawer_margin = positive("drawer_margin", (panel_height - drawer_height) / 2.0)?;
        let leg_length = positive(
            "leg_length",
            table_height - top_thickness - table.leg_glide,
        )?;

        let board_width = positive("wall_shelf.board_width", in_to_cm(shelf.board_width_in))?;
        let board_depth = std_thickness;
        let shelf_height = positive("wall_shelf.shelf_height", shelf.shelf_height)?;
        let shelf_depth = positive("wall_shelf.shelf_depth", shelf.shelf_depth)?;
        let shelf_thickness = positive("wall_shelf.shelf_thickness", shelf.shelf_thickness)?;
        let backboard_height = positive("wall_shelf.backboard_height", shelf.backboard_height)?;
        let bracket_height = positive("wall_shelf.bracket_height", shelf.bracket_height)?;
        let bolt_inset = positive("wall_shelf.bolt_inset", shelf.bolt_inset)?;
        let bolt_diameter = positive("wall_shelf.bolt_diameter", shelf.bolt_diameter)?;
        let screw_diameter = positive("wall_shelf.screw_diameter", shelf.screw_diameter)?;
        positive("wall_shelf.screw_inset", shelf.screw_inset)?;

        let wall_frame_height = positive(
            "wall_frame_height",
            shelf_height + backboard_height - table_height + top_thickness + panel_height,
        )?;
        let rail_length = positive("rail_length", table_length - 2.0 * board_width)?;
        let table_mount_height = panel_height;
        let bracket_top = wall_frame_height / 2.0 - backboard_height - shelf_thickness;
        let bracket_clearance = positive(
            "bracket_clearance",
            wall_frame_height - backboard_height - shelf_thickness - bracket_height,
        )?;
        positive("bolt_spacing", bracket_height - 2.0 * bolt_inset)?;
        let screw_offset_x = positive("screw_offset_x", shelf_depth / 2.0 - shelf.screw_inset)?;
        let screw_offset_y = positive("screw_offset_y", table_length / 2.0 - board_width / 2.0)?;

        Ok(Self {
            std_thickness,
            panel_thickness,
            table_depth,
            table_length,
            table_height,
            top_thickness,
            leg_width,
            leg_length,
            panel_height,
            side_panel_length,
            front_panel_length,
            drawer_centers: drawer_centers(
                front_panel_length,
                &table.drawer_widths,
                drawer_border_width,
            ),
            drawer_widths: table.drawer_widths.clone(),
            drawer_height,
            front_panel_excess,
            drawer_border_width,
            drawer_margin,
            board_width,
            board_depth,
            wall_frame_height,
            rail_length,
            backboard_height,
            table_mount_height,
            shelf_height,
            shelf_depth,
            shelf_length: table_length,
            shelf_thickness,
            bracket_height,
            bracket_top,
            bracket_clearance,
            bolt_inset,
            bolt_upper_z: bracket_top - bolt_inset,
            bolt_lower_z: bracket_top - bracket_height + bolt_inset,
            bolt_diameter,
            screw_offset_x,
            screw_offset_y,
            screw_diameter,
        })
    }

    /// Named view of every derived length, in declaration order
    pub fn derived_lengths(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("leg_length", self.leg_length),
            ("side_panel_length", self.side_panel_length),
            ("front_panel_length", self.front_panel_length),
            ("front_panel_excess", self.front_panel_excess),
            ("drawer_border_width", self.drawer_border_width),
            ("drawer_margin", self.drawer_margin),
            ("wall_frame_height", self.wall_frame_height),
            ("rail_length", self.rail_length),
            ("bracket_clearance", self.bracket_clearance),
            ("screw_offset_x", self.screw_offset_x),
            ("screw_offset_y", self.screw_offset_y),
        ]
    }
}
