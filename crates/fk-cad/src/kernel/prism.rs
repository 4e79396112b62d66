//! Prismatic CAD Kernel Backend
//!
//! Pure Rust kernel for axis-aligned boxes and rectangle extrusions with
//! through-all cuts. Every solid it produces has six planar faces and eight
//! corner vertices; cuts only add edge loops.

use glam::{Vec2, Vec3};

use super::{Axis, CadError, CadKernel, CadResult, Cut, CutLoop, FaceInfo, Profile, Solid};

/// Directions closer than this (after projection) count as ties
const SELECTION_TOLERANCE: f32 = 1e-4;

/// Prismatic solid kernel
#[derive(Debug, Default, Clone, Copy)]
pub struct PrismKernel;

impl PrismKernel {
    /// Create a new prismatic kernel
    pub fn new() -> Self {
        Self
    }

    fn check_size(size: Vec3) -> CadResult<()> {
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(CadError::InvalidSize(format!(
                "all extents must be positive, got [{}, {}, {}]",
                size.x, size.y, size.z
            )));
        }
        Ok(())
    }

    /// Bounds of a profile in the cut plane, as (min, max)
    fn profile_bounds(profile: &Profile) -> (Vec2, Vec2) {
        let half = profile.half_extents();
        (profile.center() - half, profile.center() + half)
    }
}

impl CadKernel for PrismKernel {
    fn name(&self) -> &str {
        "prism"
    }

    fn create_box(&self, size: Vec3) -> CadResult<Solid> {
        Self::check_size(size)?;
        let half = size * 0.5;
        Ok(Solid {
            min: -half,
            max: half,
            cuts: Vec::new(),
        })
    }

    fn extrude_rect(&self, width: f32, depth: f32, distance: f32) -> CadResult<Solid> {
        Self::check_size(Vec3::new(width, depth, distance))?;
        Ok(Solid {
            min: Vec3::new(-width / 2.0, -depth / 2.0, 0.0),
            max: Vec3::new(width / 2.0, depth / 2.0, distance),
            cuts: Vec::new(),
        })
    }

    fn cut_through(&self, solid: &Solid, axis: Axis, profile: Profile) -> CadResult<Solid> {
        if !profile.is_valid() {
            return Err(CadError::InvalidProfile(format!("{:?}", profile)));
        }

        // The outline must stay strictly inside the face it is cut from,
        // otherwise the cut would split the solid.
        let (u, v) = axis.plane_axes();
        let half_face = Vec2::new(solid.size()[u.index()], solid.size()[v.index()]) * 0.5;
        let (lo, hi) = Self::profile_bounds(&profile);
        if lo.x <= -half_face.x
            || lo.y <= -half_face.y
            || hi.x >= half_face.x
            || hi.y >= half_face.y
        {
            return Err(CadError::CutOutOfBounds(format!(
                "{:?} cut {:?} does not fit inside a {} x {} face",
                axis,
                profile,
                half_face.x * 2.0,
                half_face.y * 2.0
            )));
        }

        for (index, existing) in solid.cuts.iter().enumerate() {
            if existing.axis != axis {
                continue;
            }
            let (other_lo, other_hi) = Self::profile_bounds(&existing.profile);
            let separated = hi.x <= other_lo.x
                || other_hi.x <= lo.x
                || hi.y <= other_lo.y
                || other_hi.y <= lo.y;
            if !separated {
                return Err(CadError::OverlappingCuts {
                    other: index,
                    detail: format!("{:?} cut {:?}", axis, profile),
                });
            }
        }

        let mut result = solid.clone();
        result.cuts.push(Cut { axis, profile });
        Ok(result)
    }

    fn faces(&self, solid: &Solid) -> Vec<FaceInfo> {
        let center = solid.center();
        let size = solid.size();
        let mut faces = Vec::with_capacity(6);
        for axis in Axis::all() {
            let (u, v) = axis.plane_axes();
            let area = size[u.index()] * size[v.index()];
            for (sign, coord) in [
                (1.0_f32, solid.max[axis.index()]),
                (-1.0, solid.min[axis.index()]),
            ] {
                let mut face_center = center;
                face_center[axis.index()] = coord;
                faces.push(FaceInfo {
                    center: face_center,
                    normal: axis.unit() * sign,
                    area,
                });
            }
        }
        faces
    }

    fn vertices(&self, solid: &Solid) -> Vec<Vec3> {
        let mut vertices = Vec::with_capacity(8);
        for x in [solid.min.x, solid.max.x] {
            for y in [solid.min.y, solid.max.y] {
                for z in [solid.min.z, solid.max.z] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        vertices
    }

    fn select_face(&self, solid: &Solid, direction: Vec3) -> CadResult<FaceInfo> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Err(CadError::Selection("zero selection direction".into()));
        }
        let faces = self.faces(solid);
        select_max(&faces, |f| f.center.dot(direction))
            .copied()
            .ok_or_else(|| {
                CadError::Selection(format!("no unique face along {:?}", direction))
            })
    }

    fn select_vertex(&self, solid: &Solid, direction: Vec3) -> CadResult<Vec3> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Err(CadError::Selection("zero selection direction".into()));
        }
        let vertices = self.vertices(solid);
        select_max(&vertices, |v| v.dot(direction))
            .copied()
            .ok_or_else(|| {
                CadError::Selection(format!("no unique vertex along {:?}", direction))
            })
    }

    fn cut_loops(&self, solid: &Solid, cut_index: usize) -> CadResult<[CutLoop; 2]> {
        let cut = solid
            .cuts
            .get(cut_index)
            .ok_or(CadError::CutNotFound(cut_index))?;
        let axis = cut.axis;
        let center = cut.profile.center();
        let make_loop = |along: f32, sign: f32| CutLoop {
            cut_index,
            center: solid.plane_to_local(axis, center, along),
            normal: axis.unit() * sign,
            profile: cut.profile,
        };
        Ok([
            make_loop(solid.min[axis.index()], -1.0),
            make_loop(solid.max[axis.index()], 1.0),
        ])
    }

    fn volume(&self, solid: &Solid) -> f32 {
        let size = solid.size();
        // Overlap between cuts of different axes is not corrected
        let removed: f32 = solid
            .cuts
            .iter()
            .map(|cut| cut.profile.area() * size[cut.axis.index()])
            .sum();
        size.x * size.y * size.z - removed
    }
}

/// Pick the unique item maximising `score`, or `None` on a tie
fn select_max<T>(items: &[T], score: impl Fn(&T) -> f32) -> Option<&T> {
    let best = items.iter().map(&score).fold(f32::NEG_INFINITY, f32::max);
    let mut winners = items
        .iter()
        .filter(|item| (score(*item) - best).abs() <= SELECTION_TOLERANCE);
    let first = winners.next()?;
    if winners.next().is_some() {
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_is_centered() {
        let kernel = PrismKernel::new();
        let solid = kernel.create_box(Vec3::new(2.0, 4.0, 6.0)).unwrap();
        assert!(solid.center().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(solid.size().abs_diff_eq(Vec3::new(2.0, 4.0, 6.0), 1e-6));
        assert_eq!(kernel.faces(&solid).len(), 6);
        assert_eq!(kernel.vertices(&solid).len(), 8);
    }

    #[test]
    fn test_extrusion_starts_at_origin() {
        let kernel = PrismKernel::new();
        let solid = kernel.extrude_rect(5.0, 5.0, 84.0).unwrap();
        assert_relative_eq!(solid.min.z, 0.0);
        assert_relative_eq!(solid.max.z, 84.0);
        assert_relative_eq!(solid.min.x, -2.5);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        let kernel = PrismKernel::new();
        assert!(matches!(
            kernel.create_box(Vec3::new(1.0, 0.0, 1.0)),
            Err(CadError::InvalidSize(_))
        ));
        assert!(matches!(
            kernel.extrude_rect(1.0, 1.0, -3.0),
            Err(CadError::InvalidSize(_))
        ));
        assert!(kernel.create_box(Vec3::new(f32::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_directional_selection() {
        let kernel = PrismKernel::new();
        let solid = kernel.create_box(Vec3::new(2.0, 4.0, 6.0)).unwrap();

        let top = kernel.select_face(&solid, Vec3::Z).unwrap();
        assert!(top.normal.abs_diff_eq(Vec3::Z, 1e-6));
        assert_relative_eq!(top.center.z, 3.0);
        assert_relative_eq!(top.area, 8.0);

        let corner = kernel
            .select_vertex(&solid, Vec3::new(1.0, -1.0, 1.0))
            .unwrap();
        assert!(corner.abs_diff_eq(Vec3::new(1.0, -2.0, 3.0), 1e-6));

        // Diagonal selection of a face is ambiguous on a cube
        let cube = kernel.create_box(Vec3::ONE).unwrap();
        let diagonal = Vec3::new(1.0, 1.0, 0.0);
        assert!(kernel.select_face(&cube, diagonal).is_err());
    }

    #[test]
    fn test_cut_through_and_loops() {
        let kernel = PrismKernel::new();
        let panel = kernel.create_box(Vec3::new(100.0, 5.0, 20.0)).unwrap();
        let profile = Profile::rectangle(Vec2::new(-10.0, 0.0), 30.0, 12.0);
        let cut = kernel.cut_through(&panel, Axis::Y, profile).unwrap();

        assert!(panel.cuts.is_empty());
        assert_eq!(cut.cuts.len(), 1);

        let [back, front] = kernel.cut_loops(&cut, 0).unwrap();
        assert!(back.center.abs_diff_eq(Vec3::new(-10.0, -2.5, 0.0), 1e-6));
        assert!(front.center.abs_diff_eq(Vec3::new(-10.0, 2.5, 0.0), 1e-6));
        assert!(front.normal.abs_diff_eq(Vec3::Y, 1e-6));
        assert!(back.normal.abs_diff_eq(-Vec3::Y, 1e-6));

        let expected = 100.0 * 5.0 * 20.0 - 30.0 * 12.0 * 5.0;
        assert_relative_eq!(kernel.volume(&cut), expected);
        assert!(matches!(
            kernel.cut_loops(&cut, 1),
            Err(CadError::CutNotFound(1))
        ));
    }

    #[test]
    fn test_cut_out_of_bounds() {
        let kernel = PrismKernel::new();
        let panel = kernel.create_box(Vec3::new(100.0, 5.0, 20.0)).unwrap();

        // Taller than the panel
        let tall = Profile::rectangle(Vec2::ZERO, 10.0, 25.0);
        let result = kernel.cut_through(&panel, Axis::Y, tall);
        assert!(matches!(result, Err(CadError::CutOutOfBounds(_))));

        // Touching the edge splits the panel
        let touching = Profile::rectangle(Vec2::new(45.0, 0.0), 10.0, 5.0);
        let result = kernel.cut_through(&panel, Axis::Y, touching);
        assert!(matches!(result, Err(CadError::CutOutOfBounds(_))));
    }

    #[test]
    fn test_overlapping_cuts_rejected() {
        let kernel = PrismKernel::new();
        let panel = kernel.create_box(Vec3::new(100.0, 5.0, 20.0)).unwrap();
        let once = kernel
            .cut_through(&panel, Axis::Y, Profile::rectangle(Vec2::ZERO, 20.0, 10.0))
            .unwrap();
        let overlapping = Profile::rectangle(Vec2::new(15.0, 0.0), 20.0, 10.0);
        let result = kernel.cut_through(&once, Axis::Y, overlapping);
        assert!(matches!(
            result,
            Err(CadError::OverlappingCuts { other: 0, .. })
        ));

        // Cuts along a different axis are independent
        let drilled = kernel
            .cut_through(&once, Axis::Z, Profile::circle(Vec2::new(30.0, 0.0), 1.0))
            .unwrap();
        assert_eq!(drilled.cuts.len(), 2);
    }
}
