//! Triangle soup consumed by the reduction primitives

use sharpdecimate_core::{Face, Material, Point3f, PolyMesh};

/// A triangle mesh with one material index per face
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub face_materials: Vec<usize>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_materials: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces, all in material slot 0
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        let face_materials = vec![0; faces.len()];
        Self {
            vertices,
            faces,
            face_materials,
        }
    }

    /// Fan-triangulate a polygon mesh, keeping each face's material
    pub fn from_poly(mesh: &PolyMesh) -> Self {
        let (faces, origin) = mesh.triangulate();
        let face_materials = origin
            .iter()
            .map(|&fi| mesh.faces[fi].material_index)
            .collect();
        Self {
            vertices: mesh.vertices.clone(),
            faces,
            face_materials,
        }
    }

    /// Build a polygon mesh with fresh (smooth, uncreased) edges
    pub fn into_poly(self, materials: Vec<Option<Material>>) -> PolyMesh {
        let faces = self
            .faces
            .into_iter()
            .zip(self.face_materials)
            .map(|(f, m)| Face::with_material(f.to_vec(), m))
            .collect();
        let mut mesh = PolyMesh::new();
        mesh.vertices = self.vertices;
        mesh.faces = faces;
        mesh.materials = materials;
        mesh.ensure_edges();
        mesh
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
