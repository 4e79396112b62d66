//! Part definition

use fk_cad::{Axis, CadError, CadKernel, Datum, Profile, Solid};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::WOOD_COLOR;
use crate::feature::{Corner, Direction, FeatureKey, FeatureRegistry};

/// Which end of a through-cut a loop tag refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutSide {
    /// Loop on the face at the negative end of the cut axis
    Low,
    /// Loop on the face at the positive end of the cut axis
    High,
}

/// A named solid with its feature registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub solid: Solid,
    pub features: FeatureRegistry,
    /// Display colour (RGBA)
    pub color: [f32; 4],
}

impl Part {
    /// Wrap a solid and register its six faces and eight corners
    pub fn from_solid(
        kernel: &dyn CadKernel,
        name: impl Into<String>,
        solid: Solid,
    ) -> Result<Self, PartError> {
        let mut features = FeatureRegistry::new();

        for direction in Direction::all() {
            let face = kernel.select_face(&solid, direction.vector())?;
            let datum = Datum::face(face.center, face.normal);
            features.insert(FeatureKey::Face(direction), datum);
        }
        for corner in Corner::all() {
            let position = kernel.select_vertex(&solid, corner.direction())?;
            features.insert(FeatureKey::Vertex(corner), Datum::Vertex { position });
        }

        Ok(Self {
            name: name.into(),
            solid,
            features,
            color: WOOD_COLOR,
        })
    }

    /// Set the display colour
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Cut a profile through the part, optionally tagging one of its loops
    ///
    /// On error the part is left unchanged.
    pub fn cut(
        &mut self,
        kernel: &dyn CadKernel,
        axis: Axis,
        profile: Profile,
        tag: Option<(&str, CutSide)>,
    ) -> Result<(), PartError> {
        let solid = kernel.cut_through(&self.solid, axis, profile)?;

        let feature = match tag {
            Some((tag, side)) => {
                let key = self.unused_key(tag)?;
                let [low, high] = kernel.cut_loops(&solid, solid.cuts.len() - 1)?;
                let edge = match side {
                    CutSide::Low => low,
                    CutSide::High => high,
                };
                Some((key, Datum::edge_loop(edge.center, edge.normal)))
            }
            None => None,
        };

        self.solid = solid;
        if let Some((key, datum)) = feature {
            self.features.insert(key, datum);
        }
        Ok(())
    }

    /// Register a construction point
    pub fn tag_point(&mut self, tag: &str, position: Vec3) -> Result<(), PartError> {
        let key = self.unused_key(tag)?;
        self.features.insert(key, Datum::Point { position });
        Ok(())
    }

    fn unused_key(&self, tag: &str) -> Result<FeatureKey, PartError> {
        let key = FeatureKey::named(tag);
        if self.features.contains(&key) {
            return Err(PartError::DuplicateTag {
                part: self.name.clone(),
                tag: tag.to_string(),
            });
        }
        Ok(key)
    }

    /// Look up a feature datum in the part's local frame
    pub fn feature(&self, key: &FeatureKey) -> Option<&Datum> {
        self.features.get(key)
    }

    /// Size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.solid.size()
    }
}

/// Part construction errors
#[derive(Debug, Clone, Error)]
pub enum PartError {
    #[error(transparent)]
    Kernel(#[from] CadError),
    #[error("Tag '{tag}' already exists on part '{part}'")]
    DuplicateTag { part: String, tag: String },
}
