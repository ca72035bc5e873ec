//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use crate::topology::EdgeKey;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named material slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An edge between two vertices, carrying its shading attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshEdge {
    pub vertices: [usize; 2],
    /// `false` marks the edge as sharp for shading
    pub smooth: bool,
    /// Crease weight in [0, 1]
    pub crease: f32,
}

impl MeshEdge {
    /// Create a smooth, uncreased edge
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            vertices: [a, b],
            smooth: true,
            crease: 0.0,
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.vertices[0], self.vertices[1])
    }
}

/// A polygonal face: an ordered vertex loop plus a material slot index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub vertices: Vec<usize>,
    pub material_index: usize,
}

impl Face {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            material_index: 0,
        }
    }

    pub fn with_material(vertices: Vec<usize>, material_index: usize) -> Self {
        Self {
            vertices,
            material_index,
        }
    }

    /// Number of corners in the loop
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Keys of the edges bounding this face, in loop order
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.vertices
            .iter()
            .circular_tuple_windows()
            .map(|(&a, &b)| EdgeKey::new(a, b))
    }
}

/// A polygon mesh with attributed edges and a material table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyMesh {
    pub name: String,
    pub vertices: Vec<Point3f>,
    pub edges: Vec<MeshEdge>,
    pub faces: Vec<Face>,
    /// Material slots; `None` is an empty slot
    pub materials: Vec<Option<Material>>,
    /// Auto-smooth angle in degrees, `None` when auto-smooth is off
    pub auto_smooth_angle: Option<f32>,
}

impl PolyMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            name: String::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            materials: Vec::new(),
            auto_smooth_angle: None,
        }
    }

    /// Create a mesh from vertices and polygon loops.
    ///
    /// Every face gets material slot 0; edges are derived from the loops
    /// and start smooth with zero crease.
    pub fn from_polygons(vertices: Vec<Point3f>, polygons: Vec<Vec<usize>>) -> Self {
        let mut mesh = Self::new();
        mesh.vertices = vertices;
        mesh.faces = polygons.into_iter().map(Face::new).collect();
        mesh.ensure_edges();
        mesh
    }

    /// Create a mesh from vertices and triangles
    pub fn from_triangles(vertices: Vec<Point3f>, triangles: &[[usize; 3]]) -> Self {
        Self::from_polygons(vertices, triangles.iter().map(|t| t.to_vec()).collect())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangles after fan triangulation
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face and any of its edges that do not exist yet.
    ///
    /// Edge lookup is linear; bulk construction should go through
    /// [`PolyMesh::from_polygons`].
    pub fn add_face(&mut self, vertices: Vec<usize>, material_index: usize) -> usize {
        let face = Face::with_material(vertices, material_index);
        let missing: Vec<EdgeKey> = face
            .edge_keys()
            .filter(|key| key.0 != key.1 && self.find_edge(key.0, key.1).is_none())
            .unique()
            .collect();
        for key in missing {
            self.edges.push(MeshEdge::new(key.0, key.1));
        }
        self.faces.push(face);
        self.faces.len() - 1
    }

    /// Append a material slot, returning its index
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(Some(material));
        self.materials.len() - 1
    }

    /// Whether at least one material slot is populated
    pub fn has_materials(&self) -> bool {
        self.materials.iter().any(Option::is_some)
    }

    /// Find the edge joining `a` and `b`
    pub fn find_edge(&self, a: usize, b: usize) -> Option<usize> {
        let key = EdgeKey::new(a, b);
        self.edges.iter().position(|e| e.key() == key)
    }

    /// Map from edge key to edge index
    pub fn edge_index(&self) -> HashMap<EdgeKey, usize> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key(), i))
            .collect()
    }

    /// Append edges for face sides that have none. Existing edges keep
    /// their attributes and order.
    pub fn ensure_edges(&mut self) {
        let mut index = self.edge_index();
        let edges = &mut self.edges;
        for face in &self.faces {
            for key in face.edge_keys() {
                if key.0 == key.1 || index.contains_key(&key) {
                    continue;
                }
                index.insert(key, edges.len());
                edges.push(MeshEdge::new(key.0, key.1));
            }
        }
    }

    /// Number of edges flagged sharp
    pub fn sharp_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.smooth).count()
    }

    /// Unnormalized face normal by Newell's method; its length is twice the
    /// polygon area. Zero if a corner references a missing vertex.
    fn newell_normal(&self, face: &Face) -> Vector3f {
        let mut n = Vector3f::zeros();
        for (&a, &b) in face.vertices.iter().circular_tuple_windows() {
            let (Some(p), Some(q)) = (self.vertices.get(a), self.vertices.get(b)) else {
                return Vector3f::zeros();
            };
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n
    }

    /// Unit normal of a face, or the zero vector for a degenerate face
    pub fn face_normal(&self, face: usize) -> Vector3f {
        let n = self.newell_normal(&self.faces[face]);
        let len = n.norm();
        if len > f32::EPSILON {
            n / len
        } else {
            Vector3f::zeros()
        }
    }

    /// Area of a (planar) polygon face
    pub fn face_area(&self, face: usize) -> f32 {
        0.5 * self.newell_normal(&self.faces[face]).norm()
    }

    /// Calculate all face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        (0..self.faces.len()).map(|f| self.face_normal(f)).collect()
    }

    /// Fan-triangulate every face.
    ///
    /// Returns the triangles and, for each triangle, the index of the face
    /// it came from.
    pub fn triangulate(&self) -> (Vec<[usize; 3]>, Vec<usize>) {
        let mut triangles = Vec::with_capacity(self.triangle_count());
        let mut origin = Vec::with_capacity(self.triangle_count());
        for (fi, face) in self.faces.iter().enumerate() {
            let v = &face.vertices;
            for i in 1..v.len().saturating_sub(1) {
                triangles.push([v[0], v[i], v[i + 1]]);
                origin.push(fi);
            }
        }
        (triangles, origin)
    }

    /// Check the structural invariants: indices in range, faces with at
    /// least three corners, and an edge for every face side.
    pub fn validate(&self) -> Result<()> {
        let nv = self.vertices.len();
        for (ei, edge) in self.edges.iter().enumerate() {
            if edge.vertices.iter().any(|&v| v >= nv) {
                return Err(Error::InvalidData(format!(
                    "edge {} references a missing vertex",
                    ei
                )));
            }
        }
        let index = self.edge_index();
        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::InvalidData(format!(
                    "face {} has {} corners",
                    fi,
                    face.len()
                )));
            }
            if face.vertices.iter().any(|&v| v >= nv) {
                return Err(Error::InvalidData(format!(
                    "face {} references a missing vertex",
                    fi
                )));
            }
            if let Some(key) = face.edge_keys().find(|k| !index.contains_key(k)) {
                return Err(Error::InvalidData(format!(
                    "face {} uses edge ({}, {}) missing from the edge list",
                    fi, key.0, key.1
                )));
            }
        }
        Ok(())
    }
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}
