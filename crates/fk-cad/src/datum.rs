//! Datum geometry and rigid locations
//!
//! A datum is the geometric reference a mate constraint attaches to. Datums are
//! expressed in the local frame of the body that owns them; a [`Location`]
//! moves them into the frame of the parent assembly.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid placement (rotation followed by translation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Orientation relative to the parent frame
    pub rotation: Quat,
    /// Position of the local origin in the parent frame
    pub translation: Vec3,
}

impl Default for Location {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Location {
    /// The identity placement
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    /// Create a location from rotation and translation
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation: rotation.normalize(),
            translation,
        }
    }

    /// Pure translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    /// Map a point from the local frame into the parent frame
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    /// Map a direction from the local frame into the parent frame
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Compose with a child placement: the result maps child-local
    /// coordinates straight into this location's parent frame
    pub fn then(&self, child: &Location) -> Location {
        Location::new(
            self.rotation * child.rotation,
            self.transform_point(child.translation),
        )
    }

    /// Check approximate equality of two placements
    pub fn abs_diff_eq(&self, other: &Location, tolerance: f32) -> bool {
        // q and -q encode the same rotation
        let same_rotation = self.rotation.abs_diff_eq(other.rotation, tolerance)
            || self.rotation.abs_diff_eq(-other.rotation, tolerance);
        same_rotation && self.translation.abs_diff_eq(other.translation, tolerance)
    }
}

/// Reference geometry on a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    /// Planar face, represented by its centre and outward normal
    Face { center: Vec3, normal: Vec3 },
    /// Corner vertex
    Vertex { position: Vec3 },
    /// Closed edge loop bounding a cut, lying in a face
    Loop { center: Vec3, normal: Vec3 },
    /// Tagged construction point
    Point { position: Vec3 },
}

impl Datum {
    /// Create a face datum (normal is normalized)
    pub fn face(center: Vec3, normal: Vec3) -> Self {
        Datum::Face {
            center,
            normal: normal.normalize(),
        }
    }

    /// Create an edge loop datum (normal is normalized)
    pub fn edge_loop(center: Vec3, normal: Vec3) -> Self {
        Datum::Loop {
            center,
            normal: normal.normalize(),
        }
    }

    /// Reference point: face/loop centre, vertex or tagged point
    pub fn origin(&self) -> Vec3 {
        match self {
            Datum::Face { center, .. } | Datum::Loop { center, .. } => *center,
            Datum::Vertex { position } | Datum::Point { position } => *position,
        }
    }

    /// Outward normal, if the datum is planar
    pub fn normal(&self) -> Option<Vec3> {
        match self {
            Datum::Face { normal, .. } | Datum::Loop { normal, .. } => Some(*normal),
            Datum::Vertex { .. } | Datum::Point { .. } => None,
        }
    }

    /// Get display name of the datum kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Datum::Face { .. } => "face",
            Datum::Vertex { .. } => "vertex",
            Datum::Loop { .. } => "edge loop",
            Datum::Point { .. } => "point",
        }
    }

    /// Express the datum in the parent frame of `location`
    pub fn transformed(&self, location: &Location) -> Datum {
        match *self {
            Datum::Face { center, normal } => Datum::Face {
                center: location.transform_point(center),
                normal: location.transform_vector(normal),
            },
            Datum::Vertex { position } => Datum::Vertex {
                position: location.transform_point(position),
            },
            Datum::Loop { center, normal } => Datum::Loop {
                center: location.transform_point(center),
                normal: location.transform_vector(normal),
            },
            Datum::Point { position } => Datum::Point {
                position: location.transform_point(position),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_compose() {
        let parent = Location::new(Quat::from_rotation_z(FRAC_PI_2), Vec3::new(1.0, 0.0, 0.0));
        let child = Location::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let world = parent.then(&child);

        let p = world.transform_point(Vec3::X);
        // child: (1,2,0); parent rotation maps to (-2,1,0), then +x
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);

        // Directions only see the rotation
        assert!(world.transform_vector(Vec3::X).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_datum_transform_keeps_kind() {
        let loc = Location::new(Quat::from_rotation_x(std::f32::consts::PI), Vec3::Z);
        let face = Datum::face(Vec3::new(0.0, 0.0, 1.0), Vec3::Z).transformed(&loc);

        assert_eq!(face.kind_name(), "face");
        let normal = face.normal().unwrap();
        assert!(normal.abs_diff_eq(-Vec3::Z, 1e-5));
        assert!(face.origin().abs_diff_eq(Vec3::ZERO, 1e-5));

        let vertex = Datum::Vertex {
            position: Vec3::ONE,
        };
        assert!(vertex.normal().is_none());
    }
}
