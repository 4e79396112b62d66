//! Solved scene export
//!
//! A [`Scene`] is a plain, serialisable snapshot of a solved assembly tree.
//! It is handed to a [`SceneSink`]; [`RonSink`] writes it as pretty RON.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use fk_cad::{Cut, Location};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assembly::{Member, SolvedAssembly};
use crate::part::Part;
use crate::validation::Aabb;

/// Current scene format version
pub const SCENE_VERSION: u32 = 1;

/// Part data in a scene node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePart {
    /// Bounding box size in the part's own frame
    pub size: Vec3,
    /// Bounds in the scene's root frame
    pub bounds: Aabb,
    pub color: [f32; 4],
    /// Through-cuts in part-local coordinates
    pub cutouts: Vec<Cut>,
}

/// Node of the solved tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Location in the scene's root frame
    pub location: Location,
    /// Present on leaf nodes
    pub part: Option<ScenePart>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn from_part(part: &Part, location: Location) -> Self {
        Self {
            name: part.name.clone(),
            location,
            part: Some(ScenePart {
                size: part.size(),
                bounds: Aabb::of_part(part, &location),
                color: part.color,
                cutouts: part.solid.cuts.clone(),
            }),
            children: Vec::new(),
        }
    }

    fn from_assembly(assembly: &SolvedAssembly, location: Location) -> Self {
        let children = assembly
            .members()
            .map(|(_, solved)| {
                let world = location.then(&solved.location);
                match &solved.member {
                    Member::Part(part) => SceneNode::from_part(part, world),
                    Member::Assembly(sub) => SceneNode::from_assembly(sub, world),
                }
            })
            .collect();

        Self {
            name: assembly.name.clone(),
            location,
            part: None,
            children,
        }
    }

    /// Find a descendant by slash-separated path
    pub fn find(&self, path: &str) -> Option<&SceneNode> {
        let (head, rest) = match path.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let child = self.children.iter().find(|c| c.name == head)?;
        match rest {
            Some(rest) => child.find(rest),
            None => Some(child),
        }
    }

    /// Number of leaf parts below this node
    pub fn part_count(&self) -> usize {
        let own = usize::from(self.part.is_some());
        let children: usize = self.children.iter().map(SceneNode::part_count).sum();
        own + children
    }
}

/// Serialisable solved design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub version: u32,
    pub root: SceneNode,
}

impl Scene {
    /// Snapshot a solved assembly with its anchor frame as the root
    pub fn from_assembly(assembly: &SolvedAssembly) -> Self {
        Self {
            version: SCENE_VERSION,
            root: SceneNode::from_assembly(assembly, Location::IDENTITY),
        }
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Parse a scene from RON
    pub fn from_ron_str(content: &str) -> Result<Self, SceneError> {
        let scene: Scene =
            ron::from_str(content).map_err(|e| SceneError::Deserialize(e.to_string()))?;
        if scene.version > SCENE_VERSION {
            return Err(SceneError::UnsupportedVersion(scene.version));
        }
        Ok(scene)
    }

    /// Load a scene from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| SceneError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }
}

/// Destination for solved scenes
pub trait SceneSink {
    /// Consume one scene
    fn write_scene(&mut self, scene: &Scene) -> Result<(), SceneError>;
}

/// Writes scenes as pretty RON
pub struct RonSink<W: Write> {
    writer: W,
}

impl RonSink<File> {
    /// Create (or truncate) a RON file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = File::create(path.as_ref()).map_err(|e| SceneError::Io(e.to_string()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write> RonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get the underlying writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SceneSink for RonSink<W> {
    fn write_scene(&mut self, scene: &Scene) -> Result<(), SceneError> {
        let content = scene.to_ron_string()?;
        self.writer
            .write_all(content.as_bytes())
            .and_then(|_| self.writer.flush())
            .map_err(|e| SceneError::Io(e.to_string()))?;
        tracing::debug!(parts = scene.root.part_count(), "Wrote scene");
        Ok(())
    }
}

/// Scene export errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported scene version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::params::DesignParams;

    fn scene() -> Scene {
        let design = Design::build(&DesignParams::default()).unwrap();
        Scene::from_assembly(&design.assembly)
    }

    #[test]
    fn test_tree_shape() {
        let scene = scene();
        assert_eq!(scene.root.name, "table");
        assert_eq!(scene.root.part_count(), 16);

        let shelf = scene.root.find("wall_shelf/shelf").unwrap();
        assert!(shelf.part.is_some());
        assert!(scene.root.find("wall_shelf").unwrap().part.is_none());
        assert!(scene.root.find("wall_shelf/ghost").is_none());

        let frame = scene.root.find("face_frame").unwrap();
        assert_eq!(frame.part.as_ref().unwrap().cutouts.len(), 2);
    }

    #[test]
    fn test_ron_round_trip() {
        let scene = scene();
        let mut sink = RonSink::new(Vec::new());
        sink.write_scene(&scene).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let parsed = Scene::from_ron_str(&text).unwrap();
        assert_eq!(parsed, scene);
    }

    #[test]
    fn test_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.ron");
        let scene = scene();

        let mut sink = RonSink::create(&path).unwrap();
        sink.write_scene(&scene).unwrap();
        drop(sink);

        assert_eq!(Scene::load(&path).unwrap(), scene);
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut scene = scene();
        scene.version = SCENE_VERSION + 1;
        let text = scene.to_ron_string().unwrap();
        assert!(matches!(
            Scene::from_ron_str(&text),
            Err(SceneError::UnsupportedVersion(_))
        ));
    }
}
