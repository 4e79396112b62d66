//! Mate Constraints
//!
//! Defines the geometric relations that can be declared between datums on
//! two bodies of an assembly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::datum::{Datum, Location};

/// Kind of geometric relation between two datums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MateKind {
    /// Datum normals are anti-parallel
    Axis,
    /// Datum origins coincide
    Point,
    /// Normals anti-parallel and the second origin lies in the first datum's plane
    Plane,
}

impl MateKind {
    /// Check if this relation needs planar datums (with a normal)
    pub fn requires_normal(&self) -> bool {
        matches!(self, MateKind::Axis | MateKind::Plane)
    }

    /// Check if a datum can take part in this relation
    pub fn accepts(&self, datum: &Datum) -> bool {
        !self.requires_normal() || datum.normal().is_some()
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MateKind::Axis => "Axis",
            MateKind::Point => "Point",
            MateKind::Plane => "Plane",
        }
    }
}

/// A mate between a datum on body `a` and a datum on body `b`
///
/// Datums are given in the local frame of their body. Bodies are indices
/// into the body list handed to the solver; body 0 is the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mate {
    /// Human readable description used in diagnostics
    pub label: String,
    /// Relation kind
    pub kind: MateKind,
    /// First body
    pub body_a: usize,
    /// Datum on the first body
    pub datum_a: Datum,
    /// Second body
    pub body_b: usize,
    /// Datum on the second body
    pub datum_b: Datum,
}

impl Mate {
    /// Create a new mate
    pub fn new(
        label: impl Into<String>,
        kind: MateKind,
        (body_a, datum_a): (usize, Datum),
        (body_b, datum_b): (usize, Datum),
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            body_a,
            datum_a,
            body_b,
            datum_b,
        }
    }

    /// Check if this mate references a body
    pub fn references_body(&self, body: usize) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Evaluate the violation of this mate for the given body placements
    ///
    /// Returns zero when the mate is satisfied. Direction errors are measured
    /// on unit normals, distance errors in model units.
    pub fn residual(&self, location_a: &Location, location_b: &Location) -> f32 {
        let a = self.datum_a.transformed(location_a);
        let b = self.datum_b.transformed(location_b);

        let axis_error = |a: &Datum, b: &Datum| -> f32 {
            match (a.normal(), b.normal()) {
                // Anti-parallel normals sum to zero
                (Some(na), Some(nb)) => (na + nb).length(),
                _ => f32::INFINITY,
            }
        };

        match self.kind {
            MateKind::Axis => axis_error(&a, &b),
            MateKind::Point => (a.origin() - b.origin()).length(),
            MateKind::Plane => {
                let angle = axis_error(&a, &b);
                let normal = a.normal().unwrap_or(Vec3::ZERO);
                let distance = normal.dot(b.origin() - a.origin()).abs();
                angle.max(distance)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn top_face() -> Datum {
        Datum::face(Vec3::new(0.0, 0.0, 1.0), Vec3::Z)
    }

    fn bottom_face() -> Datum {
        Datum::face(Vec3::new(0.0, 0.0, -1.0), -Vec3::Z)
    }

    fn stack(kind: MateKind) -> Mate {
        Mate::new("stack", kind, (0, top_face()), (1, bottom_face()))
    }

    #[test]
    fn test_accepts() {
        let vertex = Datum::Vertex {
            position: Vec3::ZERO,
        };
        assert!(MateKind::Point.accepts(&vertex));
        assert!(!MateKind::Axis.accepts(&vertex));
        assert!(!MateKind::Plane.accepts(&vertex));
        assert!(MateKind::Plane.accepts(&top_face()));
    }

    #[test]
    fn test_axis_residual() {
        let mate = stack(MateKind::Axis);
        let identity = Location::IDENTITY;
        assert!(mate.residual(&identity, &identity) < 1e-6);

        // Flipping the second body makes the normals parallel
        let flipped = Location::new(Quat::from_rotation_x(std::f32::consts::PI), Vec3::ZERO);
        assert!((mate.residual(&identity, &flipped) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_plane_residual_measures_offset() {
        let mate = stack(MateKind::Plane);
        let identity = Location::IDENTITY;

        // Body b lifted so its bottom face sits on a's top face
        let seated = Location::from_translation(Vec3::new(3.0, -4.0, 2.0));
        assert!(mate.residual(&identity, &seated) < 1e-6);

        let floating = Location::from_translation(Vec3::new(0.0, 0.0, 2.5));
        assert!((mate.residual(&identity, &floating) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_point_residual() {
        let a = Datum::Vertex {
            position: Vec3::new(1.0, 1.0, 1.0),
        };
        let b = Datum::Point {
            position: Vec3::ZERO,
        };
        let mate = Mate::new("corner", MateKind::Point, (0, a), (1, b));
        let moved = Location::from_translation(Vec3::ONE);
        assert!(mate.residual(&Location::IDENTITY, &moved) < 1e-6);
    }
}
