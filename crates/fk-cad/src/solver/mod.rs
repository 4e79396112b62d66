//! Assembly mate constraints and their solver

mod mate;
mod solve;

pub use mate::{Mate, MateKind};
pub use solve::{MateSolver, SolveError};
