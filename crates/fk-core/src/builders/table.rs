//! Table parts: top, legs, side/rear panels and the drawer face frame

use fk_cad::{Axis, CadKernel, Profile};
use glam::{Vec2, Vec3};

use super::drawer_tag;
use crate::constants::WHITE_COLOR;
use crate::dimensions::Dimensions;
use crate::part::{CutSide, Part, PartError};

/// Table top slab, `depth x length x top_thickness`
pub fn table_top(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.table_depth,
        dims.table_length,
        dims.top_thickness,
    ))?;
    Part::from_solid(kernel, name, solid)
}

/// Square leg extruded upwards from the floor
pub fn leg(kernel: &dyn CadKernel, dims: &Dimensions, name: &str) -> Result<Part, PartError> {
    let solid = kernel.extrude_rect(dims.leg_width, dims.leg_width, dims.leg_length)?;
    let part = Part::from_solid(kernel, name, solid)?;
    Ok(part.with_color(WHITE_COLOR))
}

/// Panel spanning the depth between two legs
pub fn side_panel(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.side_panel_length,
        dims.panel_thickness,
        dims.panel_height,
    ))?;
    let part = Part::from_solid(kernel, name, solid)?;
    Ok(part.with_color(WHITE_COLOR))
}

/// Panel spanning the length between two legs
pub fn rear_panel(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let solid = kernel.create_box(Vec3::new(
        dims.front_panel_length,
        dims.panel_thickness,
        dims.panel_height,
    ))?;
    let part = Part::from_solid(kernel, name, solid)?;
    Ok(part.with_color(WHITE_COLOR))
}

/// Rear panel with one opening per drawer
///
/// Openings are cut through Y, centred vertically, left to right. The front
/// (+Y) loop of opening `i` is tagged `drawer_<i>`.
pub fn face_frame(
    kernel: &dyn CadKernel,
    dims: &Dimensions,
    name: &str,
) -> Result<Part, PartError> {
    let mut part = rear_panel(kernel, dims, name)?;
    for (i, (center, width)) in dims
        .drawer_centers
        .iter()
        .zip(&dims.drawer_widths)
        .enumerate()
    {
        let profile = Profile::rectangle(Vec2::new(*center, 0.0), *width, dims.drawer_height);
        let tag = drawer_tag(i + 1);
        part.cut(kernel, Axis::Y, profile, Some((&tag, CutSide::High)))?;
    }
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WOOD_COLOR;
    use crate::feature::{Direction, FeatureKey};
    use crate::params::DesignParams;
    use approx::assert_relative_eq;
    use fk_cad::{CadError, PrismKernel};

    fn dims() -> Dimensions {
        Dimensions::resolve(&DesignParams::default()).unwrap()
    }

    #[test]
    fn test_leg_spans_leg_length() {
        let kernel = PrismKernel::new();
        let leg = leg(&kernel, &dims(), "leg1").unwrap();

        let top = leg.feature(&FeatureKey::face(Direction::PosZ)).unwrap();
        let bottom = leg.feature(&FeatureKey::face(Direction::NegZ)).unwrap();
        assert_relative_eq!(top.origin().z - bottom.origin().z, 83.92, epsilon = 1e-4);
        assert_relative_eq!(bottom.origin().z, 0.0);
    }

    #[test]
    fn test_face_frame_openings() {
        let kernel = PrismKernel::new();
        let dims = dims();
        let frame = face_frame(&kernel, &dims, "face_frame").unwrap();

        assert_eq!(frame.solid.cuts.len(), 2);
        assert_eq!(
            frame.features.tags().collect::<Vec<_>>(),
            vec!["drawer_1", "drawer_2"]
        );

        let first = frame.feature(&FeatureKey::named("drawer_1")).unwrap();
        let center = first.origin();
        assert_relative_eq!(center.x, dims.drawer_centers[0], epsilon = 1e-5);
        assert_relative_eq!(center.y, dims.panel_thickness / 2.0, epsilon = 1e-5);
        assert_eq!(first.normal(), Some(Vec3::Y));

        let solid_volume = dims.front_panel_length * dims.panel_thickness * dims.panel_height;
        let openings = (70.0 + 35.0) * dims.drawer_height * dims.panel_thickness;
        assert_relative_eq!(
            kernel.volume(&frame.solid),
            solid_volume - openings,
            epsilon = 1e-1
        );
    }

    #[test]
    fn test_rebuild_is_identical() {
        let kernel = PrismKernel::new();
        let dims = dims();
        assert_eq!(
            face_frame(&kernel, &dims, "face_frame").unwrap(),
            face_frame(&kernel, &dims, "face_frame").unwrap()
        );
        assert_eq!(
            table_top(&kernel, &dims, "top").unwrap(),
            table_top(&kernel, &dims, "top").unwrap()
        );
    }

    #[test]
    fn test_colors() {
        let kernel = PrismKernel::new();
        let dims = dims();
        assert_eq!(table_top(&kernel, &dims, "top").unwrap().color, WOOD_COLOR);

        let white = [
            leg(&kernel, &dims, "leg1").unwrap(),
            side_panel(&kernel, &dims, "side_panel1").unwrap(),
            rear_panel(&kernel, &dims, "rear_panel").unwrap(),
            face_frame(&kernel, &dims, "face_frame").unwrap(),
        ];
        for part in white {
            assert_eq!(part.color, WHITE_COLOR, "{}", part.name);
        }
    }

    #[test]
    fn test_opening_taller_than_panel() {
        let kernel = PrismKernel::new();
        let mut dims = dims();
        // Bypass the resolver to reach the kernel bounds check
        dims.drawer_height = dims.panel_height + 1.0;

        let err = face_frame(&kernel, &dims, "face_frame").unwrap_err();
        assert!(matches!(
            err,
            PartError::Kernel(CadError::CutOutOfBounds(_))
        ));
    }
}
