//! Parametric furniture design
//!
//! Resolves a parameter table into dimensions, builds every part of a table
//! and its wall shelf through the [`fk_cad`] kernel, mates the parts into
//! assemblies and exports the solved tree.
//!
//! ```no_run
//! use fk_core::{Design, DesignParams, RonSink, Scene, SceneSink};
//!
//! let design = Design::build(&DesignParams::default())?;
//! let mut sink = RonSink::create("design.ron")?;
//! sink.write_scene(&Scene::from_assembly(&design.assembly))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembly;
pub mod bom;
pub mod builders;
pub mod constants;
pub mod design;
pub mod dimensions;
pub mod feature;
pub mod params;
pub mod part;
pub mod scene;
pub mod validation;

pub use assembly::{AssemblyBuilder, AssemblyError, Constraint, Member, SolvedAssembly};
pub use bom::{CutList, CutListEntry};
pub use design::{Design, DesignError, build_table, build_wall_shelf};
pub use dimensions::{DimensionError, Dimensions};
pub use feature::{Corner, Direction, FeatureKey, FeatureRef, FeatureRegistry};
pub use params::{DesignParams, ParamsError, TableParams, WallShelfParams};
pub use part::{CutSide, Part, PartError};
pub use scene::{RonSink, Scene, SceneError, SceneNode, SceneSink};
pub use validation::{Aabb, Interference, check_interference};

pub use fk_cad;
