//! Feature tags and registries
//!
//! Every part carries a registry mapping [`FeatureKey`]s to datum geometry
//! in the part's local frame. Selection runs once when the part is built;
//! constraints only ever look tags up.

use std::fmt;

use fk_cad::Datum;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Signed principal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    /// Unit vector
    pub fn vector(self) -> Vec3 {
        match self {
            Direction::PosX => Vec3::X,
            Direction::NegX => Vec3::NEG_X,
            Direction::PosY => Vec3::Y,
            Direction::NegY => Vec3::NEG_Y,
            Direction::PosZ => Vec3::Z,
            Direction::NegZ => Vec3::NEG_Z,
        }
    }

    /// All six directions
    pub fn all() -> [Direction; 6] {
        [
            Direction::PosX,
            Direction::NegX,
            Direction::PosY,
            Direction::NegY,
            Direction::PosZ,
            Direction::NegZ,
        ]
    }
}

impl fmt::Display for Direction {
    /// Selector form: `>Z` is the most positive along Z, `<Z` the most negative
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::PosX => ">X",
            Direction::NegX => "<X",
            Direction::PosY => ">Y",
            Direction::NegY => "<Y",
            Direction::PosZ => ">Z",
            Direction::NegZ => "<Z",
        };
        f.write_str(s)
    }
}

/// Box corner given by the sign of each coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corner {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl Corner {
    /// Create a corner; only the sign of each component is kept (zero counts as positive)
    pub fn new(x: i8, y: i8, z: i8) -> Self {
        let sign = |v: i8| if v < 0 { -1 } else { 1 };
        Self {
            x: sign(x),
            y: sign(y),
            z: sign(z),
        }
    }

    /// Selection direction
    pub fn direction(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// All eight corners
    pub fn all() -> Vec<Corner> {
        let mut corners = Vec::with_capacity(8);
        for x in [-1, 1] {
            for y in [-1, 1] {
                for z in [-1, 1] {
                    corners.push(Corner { x, y, z });
                }
            }
        }
        corners
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">({},{},{})", self.x, self.y, self.z)
    }
}

/// Key of a feature in a part's registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKey {
    /// Outer face selected by direction
    Face(Direction),
    /// Outer corner selected by direction
    Vertex(Corner),
    /// Named cut loop or construction point
    Named(String),
}

impl FeatureKey {
    pub fn face(direction: Direction) -> Self {
        FeatureKey::Face(direction)
    }

    pub fn corner(x: i8, y: i8, z: i8) -> Self {
        FeatureKey::Vertex(Corner::new(x, y, z))
    }

    pub fn named(name: impl Into<String>) -> Self {
        FeatureKey::Named(name.into())
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Face(direction) => write!(f, "face{}", direction),
            FeatureKey::Vertex(corner) => write!(f, "vertex{}", corner),
            FeatureKey::Named(name) => f.write_str(name),
        }
    }
}

/// Ordered map of a part's features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRegistry {
    features: IndexMap<FeatureKey, Datum>,
}

impl FeatureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature, returning the previous datum if the key existed
    pub fn insert(&mut self, key: FeatureKey, datum: Datum) -> Option<Datum> {
        self.features.insert(key, datum)
    }

    /// Look a feature up
    pub fn get(&self, key: &FeatureKey) -> Option<&Datum> {
        self.features.get(key)
    }

    /// Check if a feature exists
    pub fn contains(&self, key: &FeatureKey) -> bool {
        self.features.contains_key(key)
    }

    /// Named tags only (cut loops and construction points)
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.features.keys().filter_map(|key| match key {
            FeatureKey::Named(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Reference to a feature on an assembly member
///
/// `path` is the member name, or `"<subassembly>/<part>"` for a part inside
/// a solved sub-assembly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRef {
    pub path: String,
    pub key: FeatureKey,
}

impl FeatureRef {
    pub fn new(path: impl Into<String>, key: FeatureKey) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }

    /// Face selected by direction
    pub fn face(path: impl Into<String>, direction: Direction) -> Self {
        Self::new(path, FeatureKey::Face(direction))
    }

    /// Corner selected by sign
    pub fn vertex(path: impl Into<String>, x: i8, y: i8, z: i8) -> Self {
        Self::new(path, FeatureKey::corner(x, y, z))
    }

    /// Named tag
    pub fn tag(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(path, FeatureKey::named(name))
    }

    /// Split the path into the member name and the part inside it
    pub fn split_path(&self) -> (&str, Option<&str>) {
        match self.path.split_once('/') {
            Some((member, part)) => (member, Some(part)),
            None => (self.path.as_str(), None),
        }
    }
}

impl fmt::Display for FeatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.path, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(FeatureKey::face(Direction::PosX).to_string(), "face>X");
        assert_eq!(FeatureKey::face(Direction::NegZ).to_string(), "face<Z");

        let corner = FeatureKey::corner(-1, 1, -1);
        assert_eq!(corner.to_string(), "vertex>(-1,1,-1)");
        let named = FeatureKey::named("faceplate_mount");
        assert_eq!(named.to_string(), "faceplate_mount");
    }

    #[test]
    fn test_named_key_is_not_a_selector() {
        // Lookups go through the key itself, never through its text
        let mut registry = FeatureRegistry::new();
        let point = Datum::Point { position: Vec3::X };
        registry.insert(FeatureKey::named("face>X"), point);

        assert!(registry.contains(&FeatureKey::named("face>X")));
        assert!(!registry.contains(&FeatureKey::face(Direction::PosX)));
    }

    #[test]
    fn test_corner_keeps_sign_only() {
        assert_eq!(Corner::new(5, -3, 0), Corner { x: 1, y: -1, z: 1 });
        assert_eq!(Corner::all().len(), 8);
    }

    #[test]
    fn test_registry_order() {
        let mut registry = FeatureRegistry::new();
        registry.insert(FeatureKey::named("b"), Datum::Point { position: Vec3::X });
        let top = Datum::face(Vec3::Z, Vec3::Z);
        registry.insert(FeatureKey::face(Direction::PosZ), top);
        registry.insert(FeatureKey::named("a"), Datum::Point { position: Vec3::Y });

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(registry.contains(&FeatureKey::face(Direction::PosZ)));
        assert!(!registry.contains(&FeatureKey::face(Direction::NegZ)));
    }

    #[test]
    fn test_ref_path() {
        let nested = FeatureRef::tag("wall_shelf/v_l", "table_mount");
        assert_eq!(nested.split_path(), ("wall_shelf", Some("v_l")));
        assert_eq!(nested.to_string(), "wall_shelf/v_l@table_mount");

        let direct = FeatureRef::vertex("leg3", -1, 1, 1);
        assert_eq!(direct.split_path(), ("leg3", None));
    }
}
