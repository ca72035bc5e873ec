//! Clustering-based mesh simplification
//!
//! Rossignac & Borrel (1993) vertex clustering on a uniform grid. Much
//! cruder than edge collapse, but it never fails on messy topology, which
//! makes it the reduction of last resort.

use crate::{check_keep_ratio, MeshSimplifier, TriangleMesh};
use sharpdecimate_core::{Error, Point3f, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Strategy for selecting the representative vertex within a cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepresentativeStrategy {
    /// Arithmetic mean of all vertex positions in the cluster.
    Centroid,
    /// Weighted average using vertex valence (number of adjacent faces).
    WeightedAverage,
}

#[derive(Debug, Clone, Copy)]
struct BBox {
    min: [f64; 3],
    max: [f64; 3],
}

impl BBox {
    fn from_vertices(vertices: &[Point3f]) -> Self {
        let mut min = [f64::MAX; 3];
        let mut max = [f64::MIN; 3];
        for v in vertices {
            for i in 0..3 {
                let c = v[i] as f64;
                min[i] = min[i].min(c);
                max[i] = max[i].max(c);
            }
        }
        BBox { min, max }
    }

    fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

fn compute_vertex_valence(mesh: &TriangleMesh) -> Vec<usize> {
    let mut valence = vec![0usize; mesh.vertices.len()];
    for face in &mesh.faces {
        for &vi in face {
            valence[vi] += 1;
        }
    }
    valence
}

fn find_boundary_vertices(mesh: &TriangleMesh) -> HashSet<usize> {
    let mut edge_count: HashMap<(usize, usize), usize> = HashMap::new();
    for face in &mesh.faces {
        for j in 0..3 {
            let (a, b) = (face[j], face[(j + 1) % 3]);
            *edge_count.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    edge_count
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .flat_map(|((a, b), _)| [a, b])
        .collect()
}

fn select_representative(
    cluster: &[usize],
    positions: &[Point3f],
    valence: &[usize],
    strategy: RepresentativeStrategy,
) -> Point3f {
    let weight = |vi: usize| match strategy {
        RepresentativeStrategy::Centroid => 1.0,
        RepresentativeStrategy::WeightedAverage => valence[vi].max(1) as f64,
    };

    let mut sum = [0.0f64; 3];
    let mut w_total = 0.0f64;
    for &vi in cluster {
        let w = weight(vi);
        for (i, s) in sum.iter_mut().enumerate() {
            *s += positions[vi][i] as f64 * w;
        }
        w_total += w;
    }
    Point3f::new(
        (sum[0] / w_total) as f32,
        (sum[1] / w_total) as f32,
        (sum[2] / w_total) as f32,
    )
}

/// Uniform-grid clustering simplifier.
///
/// Every vertex is snapped into a grid cell sized so that roughly
/// `keep_ratio` of the vertices survive as cell representatives. Triangles
/// that collapse inside a cell are dropped, the rest keep their material.
#[derive(Debug, Clone)]
pub struct ClusteringSimplifier {
    /// Strategy for choosing the representative position of each cluster.
    pub representative_strategy: RepresentativeStrategy,
    /// If true, boundary vertices are clustered only with other boundary
    /// vertices in the same cell.
    pub preserve_boundary: bool,
}

impl Default for ClusteringSimplifier {
    fn default() -> Self {
        Self {
            representative_strategy: RepresentativeStrategy::Centroid,
            preserve_boundary: false,
        }
    }
}

impl ClusteringSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(
        representative_strategy: RepresentativeStrategy,
        preserve_boundary: bool,
    ) -> Self {
        Self {
            representative_strategy,
            preserve_boundary,
        }
    }

    /// Grid cell size giving about `keep_ratio * num_vertices` occupied cells.
    /// Degenerate (planar/linear) extents are left out of the volume.
    fn compute_cell_size(bbox: &BBox, num_vertices: usize, keep_ratio: f32) -> f64 {
        let target_clusters = (keep_ratio as f64 * num_vertices as f64).max(1.0);
        let eps = 1e-6;

        let extents: Vec<f64> = bbox.size().into_iter().filter(|&d| d > eps).collect();
        if extents.is_empty() {
            // All vertices at same point
            return 1.0;
        }

        // product(extents) / cell_size^dim ≈ target_clusters
        let product: f64 = extents.iter().product();
        (product / target_clusters).powf(1.0 / extents.len() as f64)
    }

    /// Group vertex indices by grid cell, in cell order.
    fn uniform_clustering(
        &self,
        mesh: &TriangleMesh,
        cell_size: f64,
        bbox: &BBox,
        boundary_verts: &HashSet<usize>,
    ) -> Vec<Vec<usize>> {
        let mut cells: BTreeMap<(i64, i64, i64, bool), Vec<usize>> = BTreeMap::new();

        for (vi, v) in mesh.vertices.iter().enumerate() {
            let ix = ((v.x as f64 - bbox.min[0]) / cell_size).floor() as i64;
            let iy = ((v.y as f64 - bbox.min[1]) / cell_size).floor() as i64;
            let iz = ((v.z as f64 - bbox.min[2]) / cell_size).floor() as i64;
            let boundary = boundary_verts.contains(&vi);
            cells.entry((ix, iy, iz, boundary)).or_default().push(vi);
        }

        cells.into_values().collect()
    }

    fn build_simplified_mesh(
        &self,
        mesh: &TriangleMesh,
        clusters: &[Vec<usize>],
        valence: &[usize],
    ) -> TriangleMesh {
        let mut vertex_to_cluster = vec![0usize; mesh.vertices.len()];
        for (ci, cluster) in clusters.iter().enumerate() {
            for &vi in cluster {
                vertex_to_cluster[vi] = ci;
            }
        }

        // Remap faces, dropping degenerate and duplicate triangles
        let mut kept: Vec<([usize; 3], usize)> = Vec::new();
        let mut seen_faces: HashSet<[usize; 3]> = HashSet::new();
        for (fi, face) in mesh.faces.iter().enumerate() {
            let c = face.map(|vi| vertex_to_cluster[vi]);
            if c[0] == c[1] || c[1] == c[2] || c[2] == c[0] {
                continue;
            }
            let mut sorted = c;
            sorted.sort_unstable();
            if seen_faces.insert(sorted) {
                let material = mesh.face_materials.get(fi).copied().unwrap_or(0);
                kept.push((c, material));
            }
        }

        // Compact: only clusters used by a surviving face become vertices
        let mut cluster_to_vertex: HashMap<usize, usize> = HashMap::new();
        let mut vertices = Vec::new();
        for (face, _) in &kept {
            for &ci in face {
                cluster_to_vertex.entry(ci).or_insert_with(|| {
                    let cluster = &clusters[ci];
                    vertices.push(if cluster.len() == 1 {
                        mesh.vertices[cluster[0]]
                    } else {
                        select_representative(
                            cluster,
                            &mesh.vertices,
                            valence,
                            self.representative_strategy,
                        )
                    });
                    vertices.len() - 1
                });
            }
        }

        let (faces, face_materials) = kept
            .into_iter()
            .map(|(f, m)| (f.map(|ci| cluster_to_vertex[&ci]), m))
            .unzip();

        TriangleMesh {
            vertices,
            faces,
            face_materials,
        }
    }
}

impl MeshSimplifier for ClusteringSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, keep_ratio: f32) -> Result<TriangleMesh> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }
        check_keep_ratio(keep_ratio)?;
        if keep_ratio == 1.0 {
            return Ok(mesh.clone());
        }
        if mesh.faces.iter().flatten().any(|&vi| vi >= mesh.vertices.len()) {
            return Err(Error::InvalidData(
                "triangle references a missing vertex".to_string(),
            ));
        }

        let bbox = BBox::from_vertices(&mesh.vertices);
        let valence = compute_vertex_valence(mesh);
        let boundary_verts = if self.preserve_boundary {
            find_boundary_vertices(mesh)
        } else {
            HashSet::new()
        };

        let cell_size = Self::compute_cell_size(&bbox, mesh.vertices.len(), keep_ratio);
        let clusters = self.uniform_clustering(mesh, cell_size, &bbox, &boundary_verts);
        let result = self.build_simplified_mesh(mesh, &clusters, &valence);

        debug!(
            cell_size,
            clusters = clusters.len(),
            faces = result.face_count(),
            "vertex clustering finished"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "vertex-clustering"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn make_single_triangle() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.5, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    fn make_plane_grid(size: usize) -> TriangleMesh {
        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                vertices.push(Point3::new(x as f32, y as f32, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..(size - 1) {
            for x in 0..(size - 1) {
                let tl = y * size + x;
                let tr = tl + 1;
                let bl = (y + 1) * size + x;
                let br = bl + 1;
                faces.push([tl, bl, tr]);
                faces.push([tr, bl, br]);
            }
        }
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    #[test]
    fn test_creation() {
        let s = ClusteringSimplifier::new();
        assert_eq!(s.representative_strategy, RepresentativeStrategy::Centroid);
        assert!(!s.preserve_boundary);
        assert_eq!(s.name(), "vertex-clustering");
    }

    #[test]
    fn test_empty_mesh() {
        assert!(ClusteringSimplifier::new().simplify(&TriangleMesh::new(), 0.5).is_err());
    }

    #[test]
    fn test_invalid_keep_ratio() {
        let s = ClusteringSimplifier::new();
        let mesh = make_single_triangle();
        assert!(s.simplify(&mesh, 0.0).is_err());
        assert!(s.simplify(&mesh, 1.5).is_err());
    }

    #[test]
    fn test_full_keep_ratio_is_noop() {
        let mesh = make_plane_grid(4);
        let result = ClusteringSimplifier::new().simplify(&mesh, 1.0).unwrap();
        assert_eq!(result, mesh);
    }

    #[test]
    fn test_cell_size_planar() {
        // 10 x 10 flat square, 100 clusters wanted -> unit cells
        let bbox = BBox {
            min: [0.0, 0.0, 0.0],
            max: [10.0, 10.0, 0.0],
        };
        let size = ClusteringSimplifier::compute_cell_size(&bbox, 200, 0.5);
        assert_relative_eq!(size, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cell_size_single_point() {
        let bbox = BBox {
            min: [1.0, 1.0, 1.0],
            max: [1.0, 1.0, 1.0],
        };
        assert_eq!(ClusteringSimplifier::compute_cell_size(&bbox, 5, 0.5), 1.0);
    }

    #[test]
    fn test_grid_reduction() {
        let mesh = make_plane_grid(11);
        let result = ClusteringSimplifier::new().simplify(&mesh, 0.25).unwrap();
        assert!(result.face_count() > 0);
        assert!(result.face_count() < mesh.face_count());
        assert!(result.vertex_count() < mesh.vertex_count());
        for face in &result.faces {
            assert!(face.iter().all(|&vi| vi < result.vertex_count()));
            assert!(face[0] != face[1] && face[1] != face[2] && face[0] != face[2]);
        }
    }

    #[test]
    fn test_materials_follow_faces() {
        let mut mesh = make_plane_grid(11);
        // Left half material 0, right half material 1
        mesh.face_materials = mesh
            .faces
            .iter()
            .map(|f| usize::from(mesh.vertices[f[0]].x >= 5.0))
            .collect();
        let result = ClusteringSimplifier::new().simplify(&mesh, 0.3).unwrap();
        assert_eq!(result.face_materials.len(), result.face_count());
        assert!(result.face_materials.contains(&0));
        assert!(result.face_materials.contains(&1));
    }

    #[test]
    fn test_weighted_representative() {
        let positions = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)];
        let valence = vec![1, 2];
        let centroid =
            select_representative(&[0, 1], &positions, &valence, RepresentativeStrategy::Centroid);
        assert_relative_eq!(centroid.x, 1.5);
        let weighted = select_representative(
            &[0, 1],
            &positions,
            &valence,
            RepresentativeStrategy::WeightedAverage,
        );
        assert_relative_eq!(weighted.x, 2.0);
    }

    #[test]
    fn test_boundary_vertices_of_grid() {
        let boundary = find_boundary_vertices(&make_plane_grid(4));
        // Perimeter of a 4x4 vertex grid
        assert_eq!(boundary.len(), 12);
        assert!(!boundary.contains(&5));
    }
}
