//! Two-tier decimation of polygon meshes
//!
//! The engine triangulates the source, reduces it with the primary
//! simplifier and rebuilds a polygon mesh with fresh edges. When the
//! primary errors or collapses everything away, the fallback simplifier
//! gets the same input. The source is only borrowed, so a failed run
//! leaves nothing behind.

use sharpdecimate_core::{Error, PolyMesh, Result};
use sharpdecimate_simplification::{
    ClusteringSimplifier, EdgeCollapseSimplifier, MeshSimplifier, TriangleMesh,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Extra collapse cost for edges on a mesh or partition border
pub const BOUNDARY_WEIGHT: f64 = 100.0;

/// Outcome of one [`DecimationEngine::decimate`] call
#[derive(Debug, Clone)]
pub struct Decimation {
    pub mesh: PolyMesh,
    pub original_faces: usize,
    pub final_faces: usize,
    /// Whether the fallback simplifier produced `mesh`
    pub used_fallback: bool,
}

impl Decimation {
    /// Share of faces removed, in percent
    pub fn reduction_percent(&self) -> f32 {
        reduction_percent(self.original_faces, self.final_faces)
    }
}

impl fmt::Display for Decimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} faces ({:.1}% reduction)",
            self.original_faces,
            self.final_faces,
            self.reduction_percent()
        )?;
        if self.used_fallback {
            f.write_str(" via fallback")?;
        }
        Ok(())
    }
}

/// Triangle keep ratio that leaves about `target_ratio` of `faces`
/// polygons once they have been split into `triangles`
fn triangle_keep_ratio(target_ratio: f32, faces: usize, triangles: usize) -> f32 {
    if triangles == 0 {
        return target_ratio;
    }
    let ratio = target_ratio as f64 * faces as f64 / triangles as f64;
    (ratio as f32).clamp(f32::MIN_POSITIVE, 1.0)
}

pub(crate) fn reduction_percent(original: usize, reduced: usize) -> f32 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - reduced as f32 / original as f32) * 100.0
}

/// Polygon-count reduction with a primary and a fallback simplifier
pub struct DecimationEngine {
    primary: Box<dyn MeshSimplifier>,
    fallback: Box<dyn MeshSimplifier>,
}

impl Default for DecimationEngine {
    /// Edge collapse that may move borders, backed by vertex clustering
    fn default() -> Self {
        Self {
            primary: Box::new(EdgeCollapseSimplifier::with_params(None, false, BOUNDARY_WEIGHT)),
            fallback: Box::new(ClusteringSimplifier::new()),
        }
    }
}

impl DecimationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, primary: impl MeshSimplifier + 'static) -> Self {
        self.primary = Box::new(primary);
        self
    }

    pub fn with_fallback(mut self, fallback: impl MeshSimplifier + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Reduce `mesh` to about `target_ratio` of its face count.
    ///
    /// Polygons are triangulated before reduction, so the result is a
    /// triangle mesh with about `target_ratio * face_count` triangles. A
    /// ratio of exactly 1.0 returns an unchanged copy. The result has
    /// smooth, uncreased edges and the material table of the source.
    /// Meshes failing [`PolyMesh::validate`] give [`Error::InvalidData`].
    pub fn decimate(&self, mesh: &PolyMesh, target_ratio: f32) -> Result<Decimation> {
        if !(target_ratio > 0.0 && target_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "decimation ratio must be in (0, 1], got {}",
                target_ratio
            )));
        }
        if mesh.is_empty() {
            return Err(Error::InvalidData("cannot decimate an empty mesh".to_string()));
        }
        mesh.validate()?;

        let original_faces = mesh.face_count();
        if target_ratio == 1.0 {
            return Ok(Decimation {
                mesh: mesh.clone(),
                original_faces,
                final_faces: original_faces,
                used_fallback: false,
            });
        }

        let triangles = TriangleMesh::from_poly(mesh);
        let keep_ratio = triangle_keep_ratio(target_ratio, original_faces, triangles.face_count());
        info!(
            mesh = %mesh.name,
            faces = original_faces,
            triangles = triangles.face_count(),
            ratio = target_ratio,
            keep_ratio,
            "decimating"
        );

        let primary = self.run(self.primary.as_ref(), &triangles, keep_ratio);
        let (reduced, used_fallback) = match primary {
            Ok(reduced) => (reduced, false),
            Err(primary_err) => {
                warn!(
                    simplifier = self.primary.name(),
                    error = %primary_err,
                    "primary reduction failed, using {}",
                    self.fallback.name()
                );
                match self.run(self.fallback.as_ref(), &triangles, keep_ratio) {
                    Ok(reduced) => (reduced, true),
                    Err(fallback_err) => {
                        return Err(Error::Decimation {
                            primary: primary_err.to_string(),
                            fallback: fallback_err.to_string(),
                        })
                    }
                }
            }
        };

        let mut result = reduced.into_poly(mesh.materials.clone());
        result.name = mesh.name.clone();
        let decimation = Decimation {
            final_faces: result.face_count(),
            mesh: result,
            original_faces,
            used_fallback,
        };
        info!(mesh = %mesh.name, "decimated {}", decimation);
        Ok(decimation)
    }

    /// One simplifier pass; an empty result counts as a failure
    fn run(
        &self,
        simplifier: &dyn MeshSimplifier,
        triangles: &TriangleMesh,
        ratio: f32,
    ) -> Result<TriangleMesh> {
        let reduced = simplifier.simplify(triangles, ratio)?;
        debug!(
            simplifier = simplifier.name(),
            faces = reduced.face_count(),
            vertices = reduced.vertex_count(),
            "reduction pass done"
        );
        if reduced.is_empty() {
            return Err(Error::Algorithm(format!(
                "{} produced an empty mesh",
                simplifier.name()
            )));
        }
        Ok(reduced)
    }
}

impl fmt::Debug for DecimationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecimationEngine")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
