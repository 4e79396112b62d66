//! Design composition: the table and its wall shelf
//!
//! Builds every part from resolved dimensions, declares how the parts touch
//! and solves each assembly once. The wall shelf is solved on its own and
//! then mounted on the rear left leg of the table as a single rigid member.

use fk_cad::{CadKernel, MateKind, MateSolver, PrismKernel};
use thiserror::Error;

use crate::assembly::{AssemblyBuilder, AssemblyError, SolvedAssembly};
use crate::builders;
use crate::dimensions::{DimensionError, Dimensions};
use crate::feature::Direction::{NegX, NegY, NegZ, PosX, PosY, PosZ};
use crate::feature::{Direction, FeatureRef};
use crate::params::DesignParams;
use crate::part::PartError;

/// Name of the table (root) assembly
pub const TABLE: &str = "table";

/// Name of the wall shelf sub-assembly
pub const WALL_SHELF: &str = "wall_shelf";

/// Design build errors
#[derive(Debug, Clone, Error)]
pub enum DesignError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    #[error(transparent)]
    Part(#[from] PartError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

fn face(path: &str, direction: Direction) -> FeatureRef {
    FeatureRef::face(path, direction)
}

/// Build and solve the wall frame with its shelf and brackets
///
/// The left upright `v_l` is the anchor. Rails run towards -Y, brackets are
/// bolted to the front (+X) of each upright and the shelf is screwed onto
/// the brackets.
pub fn build_wall_shelf(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    solver: &MateSolver,
) -> Result<SolvedAssembly, DesignError> {
    let mut assy = AssemblyBuilder::new(WALL_SHELF);
    assy.add_part(builders::wall_frame_vertical_board(kernel, dims, "v_l")?)?
        .add_part(builders::wall_frame_horizontal_board(kernel, dims, "h_t")?)?
        .add_part(builders::wall_frame_horizontal_board(kernel, dims, "h_b")?)?
        .add_part(builders::wall_frame_vertical_board(kernel, dims, "v_r")?)?
        .add_part(builders::shelf_bracket(kernel, dims, "bracket_l")?)?
        .add_part(builders::shelf_bracket(kernel, dims, "bracket_r")?)?
        .add_part(builders::shelf_board(kernel, dims, "shelf")?)?;

    // Frame: rails and the right upright share the left upright's orientation
    let frame = [("h_t", "v_l", 1), ("h_b", "v_l", -1), ("v_r", "h_t", 1)];
    for (board, from, z) in frame {
        assy.constrain(face("v_l", PosZ), face(board, NegZ), MateKind::Axis)?
            .constrain(face("v_l", NegY), face(board, PosY), MateKind::Axis)?
            .constrain(
                FeatureRef::vertex(from, 1, -1, z),
                FeatureRef::vertex(board, 1, 1, z),
                MateKind::Point,
            )?;
    }

    // Brackets bolted to the uprights
    for (upright, bracket) in [("v_l", "bracket_l"), ("v_r", "bracket_r")] {
        assy.constrain(face(upright, PosX), face(bracket, NegX), MateKind::Plane)?;
        for bolt in ["bolt_upper", "bolt_lower"] {
            assy.constrain(
                FeatureRef::tag(upright, bolt),
                FeatureRef::tag(bracket, bolt),
                MateKind::Point,
            )?;
        }
    }

    // Shelf screwed onto the brackets
    let seat = face("bracket_l", PosZ);
    assy.constrain(seat, face("shelf", NegZ), MateKind::Plane)?;
    for (bracket, side) in [("bracket_l", "left"), ("bracket_r", "right")] {
        for end in ["front", "back"] {
            assy.constrain(
                FeatureRef::tag(bracket, format!("screw_{}", end)),
                FeatureRef::tag("shelf", format!("screw_{}_{}", end, side)),
                MateKind::Point,
            )?;
        }
    }

    Ok(assy.solve(solver)?)
}

/// Build and solve the table, optionally with a solved wall shelf
///
/// The table top is the anchor at the origin. Legs hang from its corners,
/// side panels run along ±Y between the legs, the face frame closes the
/// front (+X) and the rear panel the back (-X).
pub fn build_table(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    solver: &MateSolver,
    wall_shelf: Option<SolvedAssembly>,
) -> Result<SolvedAssembly, DesignError> {
    let mut assy = AssemblyBuilder::new(TABLE);
    assy.add_part_at(
        builders::table_top(kernel, dims, "table_top")?,
        fk_cad::Location::IDENTITY,
    )?;

    let legs = [
        ("leg1", -1, -1),
        ("leg2", 1, -1),
        ("leg3", -1, 1),
        ("leg4", 1, 1),
    ];
    for (name, x, y) in legs {
        assy.add_part(builders::leg(kernel, dims, name)?)?;
        assy.constrain(face("table_top", NegZ), face(name, PosZ), MateKind::Axis)?
            .constrain(face("table_top", PosY), face(name, NegY), MateKind::Axis)?
            .constrain(
                FeatureRef::vertex("table_top", x, y, -1),
                FeatureRef::vertex(name, x, y, 1),
                MateKind::Point,
            )?;
    }

    for (name, leg) in [("side_panel1", "leg1"), ("side_panel2", "leg3")] {
        assy.add_part(builders::side_panel(kernel, dims, name)?)?;
        assy.constrain(face("table_top", NegZ), face(name, PosZ), MateKind::Axis)?
            .constrain(face("table_top", NegY), face(name, PosY), MateKind::Axis)?
            .constrain(
                FeatureRef::vertex(leg, 1, 1, 1),
                FeatureRef::vertex(name, -1, 1, 1),
                MateKind::Point,
            )?;
    }

    // Both long panels are turned so their length runs along Y
    assy.add_part(builders::face_frame(kernel, dims, "face_frame")?)?
        .add_part(builders::rear_panel(kernel, dims, "rear_panel")?)?;
    for (name, leg, x) in [("face_frame", "leg4", -1), ("rear_panel", "leg3", 1)] {
        assy.constrain(face("table_top", NegZ), face(name, PosZ), MateKind::Axis)?
            .constrain(face("table_top", PosY), face(name, PosX), MateKind::Axis)?
            .constrain(
                FeatureRef::vertex(leg, x, -1, 1),
                FeatureRef::vertex(name, -1, 1, 1),
                MateKind::Point,
            )?;
    }

    if let Some(shelf) = wall_shelf {
        let mount = format!("{}/v_l", shelf.name);
        assy.add_assembly(shelf)?;
        assy.constrain(face("leg3", PosZ), face(&mount, NegZ), MateKind::Axis)?
            .constrain(face("leg3", NegX), face(&mount, PosX), MateKind::Plane)?
            .constrain(
                FeatureRef::vertex("leg3", -1, 1, 1),
                FeatureRef::tag(&mount, "table_mount"),
                MateKind::Point,
            )?;
    }

    Ok(assy.solve(solver)?)
}

/// A fully built and solved design
#[derive(Debug, Clone)]
pub struct Design {
    pub params: DesignParams,
    pub dimensions: Dimensions,
    pub assembly: SolvedAssembly,
}

impl Design {
    /// Resolve, build and solve everything with the default kernel and solver
    pub fn build(params: &DesignParams) -> Result<Self, DesignError> {
        Self::build_with(&PrismKernel::new(), &MateSolver::new(), params)
    }

    /// Resolve, build and solve everything with a given kernel and solver
    pub fn build_with(
        kernel: &dyn CadKernel,
        solver: &MateSolver,
        params: &DesignParams,
    ) -> Result<Self, DesignError> {
        let dimensions = Dimensions::resolve(params)?;
        tracing::debug!(?dimensions, "Resolved dimensions");

        let wall_shelf = build_wall_shelf(kernel, &dimensions, solver)?;
        let assembly = build_table(kernel, &dimensions, solver, Some(wall_shelf))?;

        Ok(Self {
            params: params.clone(),
            dimensions,
            assembly,
        })
    }
}
