//! Mesh reduction primitives
//!
//! This crate provides the polygon-count reduction algorithms the
//! decimation pipeline drives:
//! - Edge collapse with quadric error metrics (primary)
//! - Uniform vertex clustering (fallback)
//!
//! Both operate on plain triangle soups with a material index per face.

pub mod triangle_mesh;
pub mod edge_collapse;
pub mod clustering;

pub use triangle_mesh::*;
pub use edge_collapse::*;
pub use clustering::*;

use sharpdecimate_core::Result;

/// Reduce the face count of a triangle mesh
pub trait MeshSimplifier {
    /// Simplify mesh keeping roughly `keep_ratio` of its faces
    /// (1.0 = no reduction, values must lie in (0.0, 1.0]).
    fn simplify(&self, mesh: &TriangleMesh, keep_ratio: f32) -> Result<TriangleMesh>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Face count a simplifier should stop at
pub(crate) fn target_face_count(faces: usize, keep_ratio: f32) -> usize {
    ((keep_ratio as f64 * faces as f64).round() as usize).max(1)
}

pub(crate) fn check_keep_ratio(keep_ratio: f32) -> Result<()> {
    if keep_ratio > 0.0 && keep_ratio <= 1.0 {
        Ok(())
    } else {
        Err(sharpdecimate_core::Error::InvalidData(format!(
            "keep ratio must be in (0.0, 1.0], got {}",
            keep_ratio
        )))
    }
}
