//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Principal axis of a body's local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Component index (x = 0, y = 1, z = 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// In-plane axes `(u, v)` of the plane perpendicular to this axis
    ///
    /// Profiles cut along X are drawn in (Y, Z), along Y in (X, Z) and
    /// along Z in (X, Y).
    pub fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// All axes
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }
}

/// A closed 2D profile used for through-cuts
///
/// Coordinates are relative to the centre of the solid's bounding box,
/// projected onto the cut plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Profile {
    /// Axis-aligned rectangle
    Rect {
        /// Centre of the rectangle
        center: Vec2,
        /// Extent along the plane's u axis
        width: f32,
        /// Extent along the plane's v axis
        height: f32,
    },
    /// Circle (drilled hole)
    Circle {
        /// Centre of the circle
        center: Vec2,
        /// Hole diameter
        diameter: f32,
    },
}

impl Profile {
    /// Create a rectangle profile
    pub fn rectangle(center: Vec2, width: f32, height: f32) -> Self {
        Profile::Rect {
            center,
            width,
            height,
        }
    }

    /// Create a circle profile
    pub fn circle(center: Vec2, diameter: f32) -> Self {
        Profile::Circle { center, diameter }
    }

    /// Centre of the profile
    pub fn center(&self) -> Vec2 {
        match self {
            Profile::Rect { center, .. } | Profile::Circle { center, .. } => *center,
        }
    }

    /// Half extents of the profile's bounding rectangle
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Profile::Rect { width, height, .. } => Vec2::new(*width, *height) * 0.5,
            Profile::Circle { diameter, .. } => Vec2::splat(*diameter * 0.5),
        }
    }

    /// Enclosed area
    pub fn area(&self) -> f32 {
        match self {
            Profile::Rect { width, height, .. } => width * height,
            Profile::Circle { diameter, .. } => std::f32::consts::PI * diameter * diameter / 4.0,
        }
    }

    /// Whether every size parameter is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        let half = self.half_extents();
        half.is_finite() && self.center().is_finite() && half.x > 0.0 && half.y > 0.0
    }
}

/// A through-all cut perpendicular to one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    /// Direction the cut goes through
    pub axis: Axis,
    /// Cut outline in the plane perpendicular to `axis`
    pub profile: Profile,
}

/// A prismatic solid body with ordered through-cuts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    /// Bounding box min (local frame)
    pub min: Vec3,
    /// Bounding box max (local frame)
    pub max: Vec3,
    /// Cuts in the order they were applied
    pub cuts: Vec<Cut>,
}

impl Solid {
    /// Size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Centre of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Map a profile-plane coordinate to 3D
    ///
    /// `along` is the coordinate on the cut axis itself.
    pub fn plane_to_local(&self, axis: Axis, point: Vec2, along: f32) -> Vec3 {
        let (u, v) = axis.plane_axes();
        let mut out = self.center();
        out[u.index()] += point.x;
        out[v.index()] += point.y;
        out[axis.index()] = along;
        out
    }
}

/// Information about a face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    /// Centre point of the face
    pub center: Vec3,
    /// Outward normal of the face
    pub normal: Vec3,
    /// Area of the face ignoring cuts
    pub area: f32,
}

/// One of the two edge loops bounding a through-cut
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutLoop {
    /// Index of the cut in [`Solid::cuts`]
    pub cut_index: usize,
    /// Centre of the loop
    pub center: Vec3,
    /// Outward normal of the face the loop lies on
    pub normal: Vec3,
    /// Outline of the loop
    pub profile: Profile,
}

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Cut exceeds the bounds of the solid: {0}")]
    CutOutOfBounds(String),

    #[error("Cut overlaps cut #{other}: {detail}")]
    OverlappingCuts {
        /// Index of the existing cut that is hit
        other: usize,
        /// Description of the rejected cut
        detail: String,
    },

    #[error("Cut not found: #{0}")]
    CutNotFound(usize),

    #[error("Selection failed: {0}")]
    Selection(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// The main CAD kernel trait
///
/// Implementations construct solids and answer directional selection
/// queries. Solids are plain values; kernels keep no state between calls.
pub trait CadKernel {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Create a box of the given size centred on the origin
    fn create_box(&self, size: Vec3) -> CadResult<Solid>;

    /// Extrude a `width` x `depth` rectangle (centred in XY) along +Z
    ///
    /// # Arguments
    /// * `width` - Extent along X
    /// * `depth` - Extent along Y
    /// * `distance` - Extrusion length along +Z
    fn extrude_rect(&self, width: f32, depth: f32, distance: f32) -> CadResult<Solid>;

    /// Cut a profile through the whole solid along `axis`
    ///
    /// Returns a new solid; the input is left untouched.
    fn cut_through(&self, solid: &Solid, axis: Axis, profile: Profile) -> CadResult<Solid>;

    // ========== Selection Methods ==========

    /// Get all faces of a solid's outer boundary
    fn faces(&self, solid: &Solid) -> Vec<FaceInfo>;

    /// Get all corner vertices of a solid's outer boundary
    fn vertices(&self, solid: &Solid) -> Vec<Vec3>;

    /// Select the face lying furthest along `direction`
    fn select_face(&self, solid: &Solid, direction: Vec3) -> CadResult<FaceInfo>;

    /// Select the vertex lying furthest along `direction`
    fn select_vertex(&self, solid: &Solid, direction: Vec3) -> CadResult<Vec3>;

    /// Get the two edge loops of a cut, ordered `[low side, high side]`
    fn cut_loops(&self, solid: &Solid, cut_index: usize) -> CadResult<[CutLoop; 2]>;

    /// Net material volume of a solid
    fn volume(&self, solid: &Solid) -> f32;
}
