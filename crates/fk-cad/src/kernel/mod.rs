//! CAD kernel abstraction
//!
//! [`CadKernel`] is the seam between the design layer and the geometry
//! backend. [`PrismKernel`] is the built-in backend.

mod prism;
mod traits;

pub use prism::PrismKernel;
pub use traits::*;
