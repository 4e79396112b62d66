//! Prismatic CAD Kernel and Mate Solver
//!
//! This crate provides:
//! - An abstract CAD kernel trait for solid construction and feature selection
//! - A pure Rust kernel for axis-aligned prismatic solids with through-cuts
//! - Datum geometry (faces, vertices, cut loops, tagged points) and rigid locations
//! - A mate solver resolving Axis, Point and Plane relations between bodies

pub mod datum;
pub mod kernel;
pub mod solver;

// Re-exports for convenience
pub use datum::{Datum, Location};
pub use kernel::{
    Axis, CadError, CadKernel, CadResult, Cut, CutLoop, FaceInfo, PrismKernel, Profile, Solid,
};
pub use solver::{Mate, MateKind, MateSolver, SolveError};
