//! Interference checks on solved assemblies

use fk_cad::Location;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assembly::SolvedAssembly;
use crate::constants::CONTACT_TOLERANCE;
use crate::part::Part;

/// Axis-aligned bounding box in the assembly frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a part's solid after moving it by `location`
    pub fn of_part(part: &Part, location: &Location) -> Self {
        let (lo, hi) = (part.solid.min, part.solid.max);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for x in [lo.x, hi.x] {
            for y in [lo.y, hi.y] {
                for z in [lo.z, hi.z] {
                    let p = location.transform_point(Vec3::new(x, y, z));
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        Self { min, max }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Per-axis overlap lengths (negative when separated along that axis)
    pub fn overlap(&self, other: &Aabb) -> Vec3 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Check if the two boxes share volume beyond `tolerance` on every axis
    pub fn intersects(&self, other: &Aabb, tolerance: f32) -> bool {
        self.overlap(other).min_element() > tolerance
    }
}

/// Two parts whose bounds overlap
#[derive(Debug, Clone, PartialEq)]
pub struct Interference {
    pub a: String,
    pub b: String,
    /// Overlap along each axis
    pub overlap: Vec3,
}

/// Find every pair of parts whose world bounds overlap
///
/// Parts that only touch (overlap within the contact tolerance on some
/// axis) are not reported.
pub fn check_interference(assembly: &SolvedAssembly) -> Vec<Interference> {
    let boxes: Vec<(String, Aabb)> = assembly
        .placed_parts()
        .into_iter()
        .map(|placed| {
            let bounds = Aabb::of_part(placed.part, &placed.location);
            (placed.path, bounds)
        })
        .collect();

    let mut found = Vec::new();
    for (i, (name_a, a)) in boxes.iter().enumerate() {
        for (name_b, b) in &boxes[i + 1..] {
            if a.intersects(b, CONTACT_TOLERANCE) {
                let overlap = a.overlap(b);
                tracing::warn!(a = %name_a, b = %name_b, ?overlap, "Parts interfere");
                found.push(Interference {
                    a: name_a.clone(),
                    b: name_b.clone(),
                    overlap,
                });
            }
        }
    }
    found
}
