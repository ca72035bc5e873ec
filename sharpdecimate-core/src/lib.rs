//! Core data structures for sharpdecimate
//!
//! This crate provides the polygon mesh model shared by the decimation
//! crates: vertices, attributed edges (smooth flag and crease weight),
//! material-indexed faces, adjacency queries, the decimation configuration
//! and the common error type.

pub mod point;
pub mod mesh;
pub mod topology;
pub mod config;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use topology::*;
pub use config::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
