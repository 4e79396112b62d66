//! Wall shelf parts: frame boards, shelf and shelf brackets

use fk_cad::{Axis, CadKernel, Profile};
use glam::{Vec2, Vec3};

use crate::dimensions::Dimensions;
use crate::part::{CutSide, Part, PartError};

/// Upright of the wall frame
///
/// Bolt holes for the bracket run through X; their front (+X) loops are
/// tagged `bolt_upper` and `bolt_lower`. `table_mount` marks the point on the
/// front edge that sits against the top of the rear leg.
pub fn wall_frame_vertical_board(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.board_depth,
        dims.board_width,
        dims.wall_frame_height,
    ))?;
    let mut part = Part::from_solid(kernel, name, solid)?;

    for (tag, z) in [
        ("bolt_upper", dims.bolt_upper_z),
        ("bolt_lower", dims.bolt_lower_z),
    ] {
        let profile = Profile::circle(Vec2::new(0.0, z), dims.bolt_diameter);
        part.cut(kernel, Axis::X, profile, Some((tag, CutSide::High)))?;
    }

    part.tag_point(
        "table_mount",
        Vec3::new(
            dims.board_depth / 2.0,
            dims.board_width / 2.0,
            -dims.wall_frame_height / 2.0 + dims.table_mount_height,
        ),
    )?;
    Ok(part)
}

/// Rail joining the two uprights
pub fn wall_frame_horizontal_board(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.board_depth,
        dims.rail_length,
        dims.board_width,
    ))?;
    Part::from_solid(kernel, name, solid)
}

/// Shelf board with four screw holes through Z
///
/// Bottom loops are tagged `screw_{front,back}_{left,right}`, with front
/// towards +X and left towards +Y.
pub fn shelf_board(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.shelf_depth,
        dims.shelf_length,
        dims.shelf_thickness,
    ))?;
    let mut part = Part::from_solid(kernel, name, solid)?;

    let x = dims.screw_offset_x;
    let y = dims.screw_offset_y;
    let holes = [
        ("screw_front_left", x, y),
        ("screw_front_right", x, -y),
        ("screw_back_left", -x, y),
        ("screw_back_right", -x, -y),
    ];
    for (tag, hx, hy) in holes {
        let profile = Profile::circle(Vec2::new(hx, hy), dims.screw_diameter);
        part.cut(kernel, Axis::Z, profile, Some((tag, CutSide::Low)))?;
    }
    Ok(part)
}

/// Block bracket carrying the shelf
///
/// Two bolt holes through X (back loops `bolt_upper`, `bolt_lower`) line up
/// with the upright; two screw holes through Z (top loops `screw_front`,
/// `screw_back`) line up with the shelf.
pub fn shelf_bracket(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.shelf_depth,
        dims.board_width,
        dims.bracket_height,
    ))?;
    let mut part = Part::from_solid(kernel, name, solid)?;

    let bolt_z = dims.bracket_height / 2.0 - dims.bolt_inset;
    for (tag, z) in [("bolt_upper", bolt_z), ("bolt_lower", -bolt_z)] {
        let profile = Profile::circle(Vec2::new(0.0, z), dims.bolt_diameter);
        part.cut(kernel, Axis::X, profile, Some((tag, CutSide::Low)))?;
    }

    for (tag, x) in [
        ("screw_front", dims.screw_offset_x),
        ("screw_back", -dims.screw_offset_x),
    ] {
        let profile = Profile::circle(Vec2::new(x, 0.0), dims.screw_diameter);
        part.cut(kernel, Axis::Z, profile, Some((tag, CutSide::High)))?;
    }
    Ok(part)
}
