//! # SharpDecimate Low-Poly
//!
//! Polygon reduction that keeps the edges that matter.
//!
//! The pipeline classifies the protected edges of the source mesh (manual
//! sharp marks, crease weights, dihedral angle), reduces the mesh with an
//! edge-collapse primitive, and restores the protected edges on the result
//! by geometric correspondence. Material regions can be decimated at
//! different ratios and merged back together.

pub mod progress;
pub mod classify;
pub mod integrity;
pub mod engine;
pub mod restore;
pub mod partition;
pub mod generator;

pub use progress::*;
pub use classify::*;
pub use integrity::*;
pub use engine::*;
pub use restore::*;
pub use partition::*;
pub use generator::*;
