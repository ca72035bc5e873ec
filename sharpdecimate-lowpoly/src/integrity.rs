//! Mesh integrity checks
//!
//! Advisory only: the checks never modify the mesh and never stop the
//! pipeline. The preflight gate is the one hard requirement.

use serde::{Deserialize, Serialize};
use sharpdecimate_core::{position_key, Error, MeshTopology, PolyMesh, PositionKey, Result};
use std::collections::HashMap;
use std::fmt;

/// Faces with a smaller area are reported as degenerate
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-4;

/// Decimal digits used to decide that two vertices overlap
pub const OVERLAP_DECIMALS: i32 = 4;

pub const MIN_VERTICES: usize = 4;
pub const MIN_FACES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// Edges with other than two adjacent faces
    NonManifoldEdges,
    /// Vertices without any edge
    LooseVertices,
    /// Faces below [`DEGENERATE_AREA_EPSILON`]
    DegenerateFaces,
    /// Rounded positions shared by several vertices
    OverlappingVertices,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IssueKind::NonManifoldEdges => "Non-manifold edges",
            IssueKind::LooseVertices => "Loose vertices",
            IssueKind::DegenerateFaces => "Degenerate faces",
            IssueKind::OverlappingVertices => "Overlapping vertices",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    pub kind: IssueKind,
    pub count: usize,
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.count)
    }
}

/// Structural anomalies found in a mesh, in a fixed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Same as [`integrity_report`]
    pub fn check(mesh: &PolyMesh) -> Self {
        integrity_report(mesh)
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Count reported for `kind`, 0 if absent
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues
            .iter()
            .find(|issue| issue.kind == kind)
            .map_or(0, |issue| issue.count)
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("Mesh is watertight");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Run every integrity check on `mesh`.
pub fn integrity_report(mesh: &PolyMesh) -> IntegrityReport {
    let topology = MeshTopology::new(mesh);

    let non_manifold = (0..mesh.edge_count())
        .filter(|&e| topology.adjacent_face_count(e) != 2)
        .count();

    let loose = (0..mesh.vertex_count())
        .filter(|&v| topology.vertex_edge_count(v) == 0)
        .count();

    let degenerate = (0..mesh.face_count())
        .filter(|&f| mesh.face_area(f) < DEGENERATE_AREA_EPSILON)
        .count();

    let mut positions: HashMap<PositionKey, usize> = HashMap::new();
    for v in &mesh.vertices {
        *positions.entry(position_key(v, OVERLAP_DECIMALS)).or_insert(0) += 1;
    }
    let overlapping = positions.values().filter(|&&n| n > 1).count();

    let issues = [
        (IssueKind::NonManifoldEdges, non_manifold),
        (IssueKind::LooseVertices, loose),
        (IssueKind::DegenerateFaces, degenerate),
        (IssueKind::OverlappingVertices, overlapping),
    ]
    .into_iter()
    .filter(|&(_, count)| count > 0)
    .map(|(kind, count)| IntegrityIssue { kind, count })
    .collect();

    IntegrityReport { issues }
}

/// Whether the mesh is large enough to decimate
pub fn preflight_validate(mesh: &PolyMesh) -> bool {
    mesh.vertex_count() >= MIN_VERTICES && mesh.face_count() >= MIN_FACES
}

/// [`preflight_validate`] as a `Result`
pub fn preflight(mesh: &PolyMesh) -> Result<()> {
    if preflight_validate(mesh) {
        Ok(())
    } else {
        Err(Error::Preflight {
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            min_vertices: MIN_VERTICES,
            min_faces: MIN_FACES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpdecimate_core::Point3f;

    fn cube_vertices() -> Vec<Point3f> {
        vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 1.0),
            Point3f::new(1.0, 0.0, 1.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(0.0, 1.0, 1.0),
        ]
    }

    fn triangulated_cube() -> PolyMesh {
        PolyMesh::from_triangles(
            cube_vertices(),
            &[
                [0, 3, 2], [0, 2, 1],
                [4, 5, 6], [4, 6, 7],
                [0, 1, 5], [0, 5, 4],
                [1, 2, 6], [1, 6, 5],
                [2, 3, 7], [2, 7, 6],
                [3, 0, 4], [3, 4, 7],
            ],
        )
    }

    #[test]
    fn test_closed_cube_is_valid() {
        let report = integrity_report(&triangulated_cube());
        assert!(report.is_valid(), "unexpected issues: {}", report);
        assert_eq!(report.to_string(), "Mesh is watertight");
        assert_eq!(IntegrityReport::check(&triangulated_cube()), report);
    }

    #[test]
    fn test_open_mesh_reports_boundary_edges() {
        let mut mesh = triangulated_cube();
        mesh.faces.truncate(10);
        let report = integrity_report(&mesh);
        assert!(!report.is_valid());
        // 4 rim edges keep one face, the removed diagonal keeps none
        assert_eq!(report.count(IssueKind::NonManifoldEdges), 5);
    }

    #[test]
    fn test_loose_and_overlapping_vertices() {
        let mut mesh = triangulated_cube();
        mesh.add_vertex(Point3f::new(5.0, 5.0, 5.0));
        mesh.add_vertex(Point3f::new(0.00001, 0.0, 0.0));
        let report = integrity_report(&mesh);
        assert_eq!(report.count(IssueKind::LooseVertices), 2);
        assert_eq!(report.count(IssueKind::OverlappingVertices), 1);
        assert_eq!(report.count(IssueKind::NonManifoldEdges), 0);
    }

    #[test]
    fn test_degenerate_face() {
        let mut mesh = triangulated_cube();
        let a = mesh.add_vertex(Point3f::new(2.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3f::new(3.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3f::new(4.0, 0.0, 0.0));
        mesh.add_face(vec![a, b, c], 0);
        let report = integrity_report(&mesh);
        assert_eq!(report.count(IssueKind::DegenerateFaces), 1);
    }

    #[test]
    fn test_issue_order_and_display() {
        let mut mesh = triangulated_cube();
        mesh.faces.truncate(10);
        mesh.add_vertex(Point3f::new(9.0, 9.0, 9.0));
        let report = integrity_report(&mesh);
        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![IssueKind::NonManifoldEdges, IssueKind::LooseVertices]);
        assert_eq!(report.to_string(), "Non-manifold edges: 5; Loose vertices: 1");
    }

    #[test]
    fn test_dangling_vertex_index_is_reported() {
        let mut mesh = triangulated_cube();
        mesh.faces[0].vertices[1] = 999;
        let report = integrity_report(&mesh);
        assert!(!report.is_valid());
        assert_eq!(report.count(IssueKind::DegenerateFaces), 1);
    }

    #[test]
    fn test_preflight() {
        let tiny = PolyMesh::from_triangles(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        );
        assert!(!preflight_validate(&tiny));
        assert!(matches!(
            preflight(&tiny),
            Err(Error::Preflight { vertices: 3, faces: 1, .. })
        ));

        let cube = PolyMesh::from_polygons(
            cube_vertices(),
            vec![
                vec![0, 3, 2, 1],
                vec![4, 5, 6, 7],
                vec![0, 1, 5, 4],
                vec![1, 2, 6, 5],
                vec![2, 3, 7, 6],
                vec![3, 0, 4, 7],
            ],
        );
        assert!(preflight_validate(&cube));
        assert!(preflight(&cube).is_ok());
    }
}
