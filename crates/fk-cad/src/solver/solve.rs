//! Mate Solver
//!
//! Places bodies relative to an anchor by propagating rigid locations
//! through mates. Each body is located once all the mates tying it to
//! already placed bodies fix its rotation and translation:
//!
//! - rotation from two non-parallel direction correspondences (TRIAD)
//! - translation from a least squares fit of point and plane equations

use glam::{Mat3, Quat, Vec3};
use thiserror::Error;

use super::{Mate, MateKind};
use crate::datum::{Datum, Location};

/// Error returned when a set of mates cannot be resolved
#[derive(Debug, Clone, Error)]
pub enum SolveError {
    #[error("Nothing to solve: no bodies given")]
    Empty,

    #[error("Mate '{label}' references unknown body #{index}")]
    UnknownBody { label: String, index: usize },

    #[error("Mate '{label}': {kind} mate cannot use a {datum}")]
    IncompatibleDatum {
        label: String,
        kind: &'static str,
        datum: &'static str,
    },

    #[error("Anchor body '{0}' is not referenced by any mate")]
    UnreferencedAnchor(String),

    #[error("Bodies not fully located by their mates: {}", .bodies.join(", "))]
    Underdetermined { bodies: Vec<String> },

    #[error("Mate '{label}' cannot be satisfied (residual {residual:.4})")]
    Contradictory { label: String, residual: f32 },
}

/// A mate seen from the body being placed
struct Link {
    kind: MateKind,
    /// Datum on the body being placed, in its local frame
    local: Datum,
    /// Datum on the placed body, in the assembly frame
    fixed: Datum,
}

/// Rigid mate solver
#[derive(Debug, Clone)]
pub struct MateSolver {
    /// Largest residual accepted when verifying the solution
    tolerance: f32,
    /// Below this cross product length two directions count as parallel
    parallel_tolerance: f32,
}

impl Default for MateSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MateSolver {
    /// Create a new solver with default parameters
    pub fn new() -> Self {
        Self {
            tolerance: 1e-3,
            parallel_tolerance: 1e-3,
        }
    }

    /// Set the verification tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Solve for the location of every body
    ///
    /// `bodies` names the bodies for diagnostics; body 0 is the anchor and
    /// keeps `anchor` as its location. Returns one location per body, in the
    /// same order.
    pub fn solve<S: AsRef<str>>(
        &self,
        bodies: &[S],
        anchor: Location,
        mates: &[Mate],
    ) -> Result<Vec<Location>, SolveError> {
        let Some(anchor_name) = bodies.first() else {
            return Err(SolveError::Empty);
        };
        self.validate(bodies.len(), mates)?;

        if bodies.len() > 1 && !mates.iter().any(|m| m.references_body(0)) {
            return Err(SolveError::UnreferencedAnchor(anchor_name.as_ref().to_string()));
        }

        let mut placed: Vec<Option<Location>> = vec![None; bodies.len()];
        placed[0] = Some(anchor);

        loop {
            let mut progress = false;
            for body in 1..bodies.len() {
                if placed[body].is_some() {
                    continue;
                }
                if let Some(location) = self.try_place(body, &placed, mates) {
                    tracing::debug!(
                        body = bodies[body].as_ref(),
                        translation = ?location.translation,
                        "Placed body"
                    );
                    placed[body] = Some(location);
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        let unplaced: Vec<String> = placed
            .iter()
            .zip(bodies)
            .filter(|(location, _)| location.is_none())
            .map(|(_, name)| name.as_ref().to_string())
            .collect();
        if !unplaced.is_empty() {
            return Err(SolveError::Underdetermined { bodies: unplaced });
        }

        let locations: Vec<Location> = placed.into_iter().flatten().collect();
        self.verify(&locations, mates)?;
        Ok(locations)
    }

    /// Reject mates pointing at missing bodies or at datums of the wrong kind
    fn validate(&self, body_count: usize, mates: &[Mate]) -> Result<(), SolveError> {
        for mate in mates {
            for (index, datum) in [(mate.body_a, &mate.datum_a), (mate.body_b, &mate.datum_b)] {
                if index >= body_count {
                    return Err(SolveError::UnknownBody {
                        label: mate.label.clone(),
                        index,
                    });
                }
                if !mate.kind.accepts(datum) {
                    return Err(SolveError::IncompatibleDatum {
                        label: mate.label.clone(),
                        kind: mate.kind.display_name(),
                        datum: datum.kind_name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check every mate against the final locations
    fn verify(&self, locations: &[Location], mates: &[Mate]) -> Result<(), SolveError> {
        for mate in mates {
            let residual = mate.residual(&locations[mate.body_a], &locations[mate.body_b]);
            if residual.is_nan() || residual > self.tolerance {
                return Err(SolveError::Contradictory {
                    label: mate.label.clone(),
                    residual,
                });
            }
        }
        Ok(())
    }

    /// Try to locate one body from its mates to placed bodies
    fn try_place(
        &self,
        body: usize,
        placed: &[Option<Location>],
        mates: &[Mate],
    ) -> Option<Location> {
        let links = Self::links(body, placed, mates);
        if links.is_empty() {
            return None;
        }

        let rotation = self.solve_rotation(&links)?;
        let translation = self.solve_translation(&links, rotation)?;
        Some(Location::new(rotation, translation))
    }

    /// Collect the mates between `body` and bodies that are already placed
    fn links(body: usize, placed: &[Option<Location>], mates: &[Mate]) -> Vec<Link> {
        mates
            .iter()
            .filter_map(|mate| {
                let (local, other, other_datum) = if mate.body_a == mate.body_b {
                    return None;
                } else if mate.body_a == body {
                    (mate.datum_a, mate.body_b, mate.datum_b)
                } else if mate.body_b == body {
                    (mate.datum_b, mate.body_a, mate.datum_a)
                } else {
                    return None;
                };

                let location = placed[other].as_ref()?;
                Some(Link {
                    kind: mate.kind,
                    local,
                    fixed: other_datum.transformed(location),
                })
            })
            .collect()
    }

    /// Find the rotation mapping local directions onto their world targets
    fn solve_rotation(&self, links: &[Link]) -> Option<Quat> {
        let mut pairs: Vec<(Vec3, Vec3)> = Vec::new();

        // A mated normal must end up opposite the fixed normal
        for link in links.iter().filter(|l| l.kind.requires_normal()) {
            if let (Some(local), Some(fixed)) = (link.local.normal(), link.fixed.normal()) {
                pairs.push((local, -fixed));
            }
        }

        // Offsets between coincident points are preserved by the rotation
        let points: Vec<(Vec3, Vec3)> = links
            .iter()
            .filter(|l| l.kind == MateKind::Point)
            .map(|l| (l.local.origin(), l.fixed.origin()))
            .collect();
        if let Some(&(local0, world0)) = points.first() {
            for &(local, world) in points.iter().skip(1) {
                pairs.push((local - local0, world - world0));
            }
        }

        let parallel = self.parallel_tolerance;
        let mut usable = pairs
            .into_iter()
            .filter(|(l, w)| l.length() > parallel && w.length() > parallel)
            .map(|(l, w)| (l.normalize(), w.normalize()));

        let (local1, world1) = usable.next()?;
        let (local2, world2) = usable.find(|(l, _)| l.cross(local1).length() > parallel)?;

        let local = self.frame(local1, local2);
        let world = self.frame(world1, world2);
        Some(Quat::from_mat3(&(world * local.transpose())).normalize())
    }

    /// Orthonormal frame with `a` as first axis and the `a, b` plane normal as second
    fn frame(&self, a: Vec3, b: Vec3) -> Mat3 {
        let cross = a.cross(b);
        let second = if cross.length() > self.parallel_tolerance {
            cross.normalize()
        } else {
            // Degenerate targets; the verification pass reports the conflict
            a.any_orthonormal_vector()
        };
        Mat3::from_cols(a, second, a.cross(second))
    }

    /// Least squares translation for a known rotation
    ///
    /// Point mates give `t = w - R l`, plane mates `n . t = n . (o - R l)`.
    #[allow(clippy::needless_range_loop)]
    fn solve_translation(&self, links: &[Link], rotation: Quat) -> Option<Vec3> {
        let mut rows: Vec<(Vec3, f32)> = Vec::new();

        for link in links {
            let rotated = rotation * link.local.origin();
            match link.kind {
                MateKind::Point => {
                    let target = link.fixed.origin() - rotated;
                    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                        rows.push((axis, axis.dot(target)));
                    }
                }
                MateKind::Plane => {
                    if let Some(normal) = link.fixed.normal() {
                        rows.push((normal, normal.dot(link.fixed.origin() - rotated)));
                    }
                }
                MateKind::Axis => {}
            }
        }

        if rows.is_empty() {
            return None;
        }

        // Normal equations: A^T A t = A^T b
        let mut ata = [[0.0f32; 3]; 3];
        let mut atb = [0.0f32; 3];
        for (row, value) in &rows {
            let r = row.to_array();
            for i in 0..3 {
                for k in 0..3 {
                    ata[i][k] += r[i] * r[k];
                }
                atb[i] += r[i] * value;
            }
        }

        let solution = gaussian_elimination(&mut ata, &mut atb)?;
        Some(Vec3::from_array(solution))
    }
}

/// Gaussian elimination with partial pivoting
///
/// Returns `None` when the system is singular.
#[allow(clippy::needless_range_loop)]
fn gaussian_elimination(a: &mut [[f32; 3]; 3], b: &mut [f32; 3]) -> Option<[f32; 3]> {
    let n = b.len();

    // Forward elimination
    for i in 0..n {
        let mut max_row = i;
        let mut max_val = a[i][i].abs();
        for k in (i + 1)..n {
            if a[k][i].abs() > max_val {
                max_val = a[k][i].abs();
                max_row = k;
            }
        }

        if max_val < 1e-6 {
            return None;
        }

        if max_row != i {
            a.swap(i, max_row);
            b.swap(i, max_row);
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / a[i][i];
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
            b[k] -= factor * b[i];
        }
    }

    // Back substitution
    let mut x = [0.0f32; 3];
    for i in (0..n).rev() {
        x[i] = b[i];
        for j in (i + 1)..n {
            x[i] -= a[i][j] * x[j];
        }
        x[i] /= a[i][i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Face of a 2x2x2 cube centred on the origin
    fn face(direction: Vec3) -> Datum {
        Datum::face(direction, direction)
    }

    fn vertex(x: f32, y: f32, z: f32) -> Datum {
        Datum::Vertex {
            position: Vec3::new(x, y, z),
        }
    }

    /// Mates stacking `upper` on top of `lower` with matching orientation
    fn stack(lower: usize, upper: usize) -> Vec<Mate> {
        vec![
            Mate::new(
                "top",
                MateKind::Axis,
                (lower, face(Vec3::Z)),
                (upper, face(-Vec3::Z)),
            ),
            Mate::new(
                "side",
                MateKind::Axis,
                (lower, face(Vec3::X)),
                (upper, face(-Vec3::X)),
            ),
            Mate::new(
                "corner",
                MateKind::Point,
                (lower, vertex(1.0, 1.0, 1.0)),
                (upper, vertex(1.0, 1.0, -1.0)),
            ),
        ]
    }

    #[test]
    fn test_stack_two_boxes() {
        let solver = MateSolver::new();
        let locations = solver
            .solve(&["base", "lid"], Location::IDENTITY, &stack(0, 1))
            .unwrap();

        assert!(locations[0].abs_diff_eq(&Location::IDENTITY, 1e-6));
        let lifted = Location::from_translation(Vec3::new(0.0, 0.0, 2.0));
        assert!(locations[1].abs_diff_eq(&lifted, 1e-4));
    }

    #[test]
    fn test_rotated_placement() {
        // Mating like faces flips the body half a turn about Y
        let mates = vec![
            Mate::new("z", MateKind::Axis, (0, face(Vec3::Z)), (1, face(Vec3::Z))),
            Mate::new("x", MateKind::Axis, (0, face(Vec3::X)), (1, face(Vec3::X))),
            Mate::new(
                "p",
                MateKind::Point,
                (0, vertex(1.0, 1.0, 1.0)),
                (1, vertex(1.0, 1.0, 1.0)),
            ),
        ];

        let locations = MateSolver::new()
            .solve(&["a", "b"], Location::IDENTITY, &mates)
            .unwrap();
        let b = locations[1];

        assert!(b.transform_vector(Vec3::Z).abs_diff_eq(-Vec3::Z, 1e-4));
        assert!(b.transform_vector(Vec3::X).abs_diff_eq(-Vec3::X, 1e-4));
        assert!(b.transform_point(Vec3::ONE).abs_diff_eq(Vec3::ONE, 1e-4));
        assert_relative_eq!(b.translation.x, 2.0, epsilon = 1e-4);
        assert_relative_eq!(b.translation.z, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_chain_resolves_out_of_order() {
        // "top" only mates with "middle", which is listed after it
        let mut mates = stack(2, 1);
        mates.extend(stack(0, 2));

        let locations = MateSolver::new()
            .solve(&["base", "top", "middle"], Location::IDENTITY, &mates)
            .unwrap();

        assert_relative_eq!(locations[2].translation.z, 2.0, epsilon = 1e-4);
        assert_relative_eq!(locations[1].translation.z, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_anchor_location_is_kept() {
        let anchor = Location::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let locations = MateSolver::new()
            .solve(&["base", "lid"], anchor, &stack(0, 1))
            .unwrap();

        assert!(locations[0].abs_diff_eq(&anchor, 1e-6));
        let lid = locations[1].translation;
        assert!(lid.abs_diff_eq(Vec3::new(10.0, 0.0, 2.0), 1e-4));
    }

    #[test]
    fn test_plane_mates_slide_into_place() {
        // Bracket-style placement: seated on a plane, located by two points
        let mates = vec![
            Mate::new(
                "seat",
                MateKind::Plane,
                (0, face(Vec3::X)),
                (1, face(-Vec3::X)),
            ),
            Mate::new(
                "upper",
                MateKind::Point,
                (0, vertex(1.0, 0.0, 0.5)),
                (1, vertex(-1.0, 0.0, 0.0)),
            ),
            Mate::new(
                "lower",
                MateKind::Point,
                (0, vertex(1.0, 0.0, -0.5)),
                (1, vertex(-1.0, 0.0, -1.0)),
            ),
        ];

        let locations = MateSolver::new()
            .solve(&["board", "bracket"], Location::IDENTITY, &mates)
            .unwrap();

        let bracket = locations[1].translation;
        assert!(bracket.abs_diff_eq(Vec3::new(2.0, 0.0, 0.5), 1e-4));
    }

    #[test]
    fn test_empty() {
        let bodies: [&str; 0] = [];
        let result = MateSolver::new().solve(&bodies, Location::IDENTITY, &[]);
        assert!(matches!(result, Err(SolveError::Empty)));
    }

    #[test]
    fn test_single_body_needs_no_mates() {
        let locations = MateSolver::new()
            .solve(&["only"], Location::IDENTITY, &[])
            .unwrap();
        assert_eq!(locations.len(), 1);
    }

    #[test]
    fn test_unreferenced_anchor() {
        let bodies = ["base", "a", "b"];
        let result = MateSolver::new().solve(&bodies, Location::IDENTITY, &stack(1, 2));
        match result {
            Err(SolveError::UnreferencedAnchor(name)) => assert_eq!(name, "base"),
            other => panic!("Expected UnreferencedAnchor, got {:?}", other),
        }
    }

    #[test]
    fn test_underdetermined() {
        let mates = vec![Mate::new(
            "top",
            MateKind::Axis,
            (0, face(Vec3::Z)),
            (1, face(-Vec3::Z)),
        )];

        let result = MateSolver::new().solve(&["base", "lid"], Location::IDENTITY, &mates);
        match result {
            Err(SolveError::Underdetermined { bodies }) => assert_eq!(bodies, vec!["lid"]),
            other => panic!("Expected Underdetermined, got {:?}", other),
        }
    }

    #[test]
    fn test_contradictory() {
        let mut mates = stack(0, 1);
        mates.push(Mate::new(
            "other corner",
            MateKind::Point,
            (0, vertex(1.0, 1.0, 1.0)),
            (1, vertex(-1.0, 1.0, -1.0)),
        ));

        let result = MateSolver::new().solve(&["base", "lid"], Location::IDENTITY, &mates);
        assert!(
            matches!(result, Err(SolveError::Contradictory { .. })),
            "Expected Contradictory, got {:?}",
            result
        );
    }

    #[test]
    fn test_tolerance_accepts_small_misfit() {
        // Second corner sits 0.005 too high
        let mut mates = stack(0, 1);
        mates.push(Mate::new(
            "near corner",
            MateKind::Point,
            (0, vertex(-1.0, 1.0, 1.0)),
            (1, vertex(-1.0, 1.0, -0.995)),
        ));

        let strict = MateSolver::new().solve(&["base", "lid"], Location::IDENTITY, &mates);
        assert!(matches!(strict, Err(SolveError::Contradictory { .. })));

        let locations = MateSolver::new()
            .with_tolerance(1e-2)
            .solve(&["base", "lid"], Location::IDENTITY, &mates)
            .unwrap();
        assert_relative_eq!(locations[1].translation.z, 1.9975, epsilon = 1e-4);
    }

    #[test]
    fn test_incompatible_datum() {
        let mates = vec![Mate::new(
            "bad",
            MateKind::Axis,
            (0, vertex(1.0, 1.0, 1.0)),
            (1, face(Vec3::Z)),
        )];

        let result = MateSolver::new().solve(&["a", "b"], Location::IDENTITY, &mates);
        assert!(matches!(result, Err(SolveError::IncompatibleDatum { .. })));
    }
}
