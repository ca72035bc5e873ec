//! Protected edge classification
//!
//! An edge is protected when any of three independent criteria holds:
//! - its dihedral angle exceeds the sharp angle (Angle)
//! - it is marked sharp by hand (ManualSharp)
//! - it carries a crease weight (Crease)

use serde::{Deserialize, Serialize};
use sharpdecimate_core::{EdgeKey, MeshTopology, Point3f, PolyMesh};

/// Crease weights at or below this are treated as uncreased
pub const CREASE_THRESHOLD: f32 = 0.01;

/// Why an edge is protected. Several tags may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTags {
    pub angle: bool,
    pub manual_sharp: bool,
    pub crease: bool,
}

impl EdgeTags {
    pub fn any(&self) -> bool {
        self.angle || self.manual_sharp || self.crease
    }
}

/// A protected edge of the classified mesh, with what is needed to find
/// it again after its vertex indices have changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtectedEdge {
    pub index: usize,
    pub key: EdgeKey,
    pub endpoints: [Point3f; 2],
    pub tags: EdgeTags,
    pub crease: f32,
}

/// The protected edges of one mesh, in edge order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtectionSet {
    pub sharp_angle_degrees: f32,
    pub edges: Vec<ProtectedEdge>,
}

impl ProtectionSet {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedEdge> {
        self.edges.iter()
    }

    /// Indices of Angle-tagged edges
    pub fn angle_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().filter(|e| e.tags.angle).map(|e| e.index)
    }

    /// Indices of ManualSharp-tagged edges
    pub fn manual_sharp_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .filter(|e| e.tags.manual_sharp)
            .map(|e| e.index)
    }

    /// Indices of Crease-tagged edges
    pub fn creased_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().filter(|e| e.tags.crease).map(|e| e.index)
    }
}

/// Classify the protected edges of `mesh`.
///
/// Pure: the mesh is only read. Boundary and non-manifold edges can still
/// be protected by a manual mark or a crease, but never by angle. Edges
/// pointing at a missing vertex are skipped.
pub fn classify(mesh: &PolyMesh, sharp_angle_degrees: f32) -> ProtectionSet {
    let topology = MeshTopology::new(mesh);

    let edges = topology
        .edge_records(mesh)
        .into_iter()
        .filter_map(|record| {
            let tags = EdgeTags {
                angle: record
                    .dihedral_angle
                    .is_some_and(|angle| angle > sharp_angle_degrees),
                manual_sharp: !record.smooth,
                crease: record.crease > CREASE_THRESHOLD,
            };
            if !tags.any() {
                return None;
            }
            let endpoints = [
                *mesh.vertices.get(record.key.0)?,
                *mesh.vertices.get(record.key.1)?,
            ];
            Some(ProtectedEdge {
                index: record.index,
                key: record.key,
                endpoints,
                tags,
                crease: record.crease,
            })
        })
        .collect();

    ProtectionSet {
        sharp_angle_degrees,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> PolyMesh {
        PolyMesh::from_polygons(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
                Point3f::new(0.0, 0.0, 1.0),
                Point3f::new(1.0, 0.0, 1.0),
                Point3f::new(1.0, 1.0, 1.0),
                Point3f::new(0.0, 1.0, 1.0),
            ],
            vec![
                vec![0, 3, 2, 1],
                vec![4, 5, 6, 7],
                vec![0, 1, 5, 4],
                vec![1, 2, 6, 5],
                vec![2, 3, 7, 6],
                vec![3, 0, 4, 7],
            ],
        )
    }

    #[test]
    fn test_cube_edges_tagged_below_right_angle() {
        let mesh = cube();
        let set = classify(&mesh, 75.0);
        assert_eq!(set.len(), 12);
        assert!(set.iter().all(|e| e.tags.angle && !e.tags.manual_sharp && !e.tags.crease));
    }

    #[test]
    fn test_cube_edges_untagged_above_right_angle() {
        let set = classify(&cube(), 95.0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_manual_sharp_and_crease() {
        let mut mesh = cube();
        mesh.edges[0].smooth = false;
        mesh.edges[1].crease = 0.5;
        mesh.edges[2].crease = CREASE_THRESHOLD;

        let set = classify(&mesh, 120.0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.manual_sharp_edges().collect::<Vec<_>>(), vec![0]);
        assert_eq!(set.creased_edges().collect::<Vec<_>>(), vec![1]);
        assert_eq!(set.angle_edges().count(), 0);
        assert!(set.iter().all(|e| e.index != 2));
        assert_eq!(set.iter().find(|e| e.index == 1).map(|e| e.crease), Some(0.5));
    }

    #[test]
    fn test_tags_accumulate() {
        let mut mesh = cube();
        mesh.edges[3].smooth = false;
        mesh.edges[3].crease = 1.0;
        let set = classify(&mesh, 45.0);
        let edge = set.iter().find(|e| e.index == 3).unwrap();
        assert!(edge.tags.angle && edge.tags.manual_sharp && edge.tags.crease);
        assert_eq!(set.len(), 12);
    }

    #[test]
    fn test_boundary_edges_never_angle_tagged() {
        // Open box: the top face is missing, so its rim edges are boundary
        let mut mesh = cube();
        mesh.faces.remove(1);
        let set = classify(&mesh, 10.0);
        let rim = mesh.find_edge(4, 5).unwrap();
        assert!(set.iter().all(|e| e.index != rim));
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_endpoints_follow_edge_key() {
        let mesh = cube();
        let set = classify(&mesh, 75.0);
        for edge in set.iter() {
            assert_eq!(edge.endpoints[0], mesh.vertices[edge.key.0]);
            assert_eq!(edge.endpoints[1], mesh.vertices[edge.key.1]);
        }
    }

    #[test]
    fn test_dangling_edge_is_skipped() {
        let mut mesh = cube();
        mesh.edges[0].smooth = false;
        mesh.edges[1].smooth = false;
        mesh.edges[1].vertices[1] = 999;
        mesh.faces[0].vertices[2] = 999;

        let set = classify(&mesh, 120.0);
        assert_eq!(set.manual_sharp_edges().collect::<Vec<_>>(), vec![0]);
    }
}
