//! Edge/face adjacency and dihedral angles

use crate::mesh::PolyMesh;
use crate::point::Vector3f;
use serde::{Deserialize, Serialize};

/// Unordered vertex pair identifying an edge within one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Derived per-edge view of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub index: usize,
    pub key: EdgeKey,
    pub smooth: bool,
    pub crease: f32,
    pub face_count: usize,
    /// Degrees; only set for edges with exactly two adjacent faces
    pub dihedral_angle: Option<f32>,
}

/// Angle in degrees between two unit normals, in [0, 180].
///
/// Returns `None` if either normal is degenerate.
pub fn angle_between_normals(a: &Vector3f, b: &Vector3f) -> Option<f32> {
    if a.norm_squared() < 0.5 || b.norm_squared() < 0.5 {
        return None;
    }
    let cos = a.dot(b).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Adjacency snapshot of a [`PolyMesh`].
///
/// Indexed by the mesh's edge and vertex indices; it is invalidated by any
/// topological edit of the mesh it was built from.
#[derive(Debug, Clone)]
pub struct MeshTopology {
    edge_faces: Vec<Vec<usize>>,
    vertex_edges: Vec<usize>,
    face_normals: Vec<Vector3f>,
}

impl MeshTopology {
    pub fn new(mesh: &PolyMesh) -> Self {
        let index = mesh.edge_index();
        let mut edge_faces = vec![Vec::new(); mesh.edges.len()];
        for (fi, face) in mesh.faces.iter().enumerate() {
            for key in face.edge_keys() {
                if let Some(&ei) = index.get(&key) {
                    // A face touches each of its edges once, even if the
                    // loop revisits it.
                    if edge_faces[ei].last() != Some(&fi) {
                        edge_faces[ei].push(fi);
                    }
                }
            }
        }

        let mut vertex_edges = vec![0usize; mesh.vertices.len()];
        for edge in &mesh.edges {
            for &v in &edge.vertices {
                if let Some(count) = vertex_edges.get_mut(v) {
                    *count += 1;
                }
            }
        }

        Self {
            edge_faces,
            vertex_edges,
            face_normals: mesh.calculate_face_normals(),
        }
    }

    /// Faces adjacent to an edge
    pub fn edge_faces(&self, edge: usize) -> &[usize] {
        &self.edge_faces[edge]
    }

    pub fn adjacent_face_count(&self, edge: usize) -> usize {
        self.edge_faces[edge].len()
    }

    /// Number of edges incident to a vertex
    pub fn vertex_edge_count(&self, vertex: usize) -> usize {
        self.vertex_edges[vertex]
    }

    pub fn face_normal(&self, face: usize) -> &Vector3f {
        &self.face_normals[face]
    }

    /// Dihedral angle in degrees of a manifold edge.
    ///
    /// `None` for boundary and non-manifold edges, and when either face is
    /// degenerate.
    pub fn dihedral_angle(&self, edge: usize) -> Option<f32> {
        match self.edge_faces[edge].as_slice() {
            [a, b] => angle_between_normals(&self.face_normals[*a], &self.face_normals[*b]),
            _ => None,
        }
    }

    /// One record per edge of `mesh`
    pub fn edge_records(&self, mesh: &PolyMesh) -> Vec<EdgeRecord> {
        mesh.edges
            .iter()
            .enumerate()
            .map(|(i, e)| EdgeRecord {
                index: i,
                key: e.key(),
                smooth: e.smooth,
                crease: e.crease,
                face_count: self.adjacent_face_count(i),
                dihedral_angle: self.dihedral_angle(i),
            })
            .collect()
    }
}
