//! Procedural meshes shared by the demo binaries

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sharpdecimate_core::{Face, Material, Point3f, PolyMesh};
use std::collections::HashMap;

/// Closed unit box with every side split into `n x n` quads.
///
/// The vertical corner edge at x = y = 0 is marked sharp by hand and the
/// top face carries creases, so every kind of protection shows up.
pub fn subdivided_box(n: usize) -> PolyMesh {
    let mut mesh = PolyMesh::new().with_name("Box");
    let mut index: HashMap<[i64; 3], usize> = HashMap::new();
    let n_i = n as i64;

    for (axis, fixed, flip) in [
        (0usize, 0i64, true),
        (0, n_i, false),
        (1, 0, true),
        (1, n_i, false),
        (2, 0, true),
        (2, n_i, false),
    ] {
        let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
        for a in 0..n_i {
            for b in 0..n_i {
                let mut quad: Vec<usize> = [(0, 0), (1, 0), (1, 1), (0, 1)]
                    .iter()
                    .map(|&(da, db)| {
                        let mut p = [0i64; 3];
                        p[axis] = fixed;
                        p[u] = a + da;
                        p[v] = b + db;
                        *index.entry(p).or_insert_with(|| {
                            mesh.add_vertex(Point3f::new(
                                p[0] as f32 / n as f32,
                                p[1] as f32 / n as f32,
                                p[2] as f32 / n as f32,
                            ))
                        })
                    })
                    .collect();
                if flip {
                    quad.reverse();
                }
                mesh.faces.push(Face::new(quad));
            }
        }
    }
    mesh.ensure_edges();

    let vertices = mesh.vertices.clone();
    for edge in &mut mesh.edges {
        let [a, b] = edge.vertices.map(|v| vertices[v]);
        if a.x == 0.0 && b.x == 0.0 && a.y == 0.0 && b.y == 0.0 {
            edge.smooth = false;
        } else if a.z == 1.0 && b.z == 1.0 {
            edge.crease = 0.8;
        }
    }
    mesh
}

/// Noisy UV sphere of quads capped with triangle fans.
///
/// The upper half uses a "HighDetail" material and the lower half a plain
/// one, which gives material partitioning two regions to work on.
pub fn noisy_sphere(rings: usize, segments: usize, seed: u64) -> PolyMesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mesh = PolyMesh::new().with_name("Sphere");
    mesh.add_material(Material::new("Shell_HighDetail"));
    mesh.add_material(Material::new("Shell"));

    let top = mesh.add_vertex(Point3f::new(0.0, 0.0, 1.0));
    for r in 1..rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        for s in 0..segments {
            let theta = 2.0 * std::f32::consts::PI * s as f32 / segments as f32;
            let radius = 1.0 + rng.gen_range(-0.02..0.02);
            mesh.add_vertex(Point3f::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ));
        }
    }
    let bottom = mesh.add_vertex(Point3f::new(0.0, 0.0, -1.0));

    let ring = |r: usize, s: usize| 1 + (r - 1) * segments + s % segments;
    for s in 0..segments {
        mesh.faces
            .push(Face::with_material(vec![top, ring(1, s), ring(1, s + 1)], 0));
    }
    for r in 1..rings - 1 {
        let material = usize::from(r >= rings / 2);
        for s in 0..segments {
            mesh.faces.push(Face::with_material(
                vec![ring(r, s), ring(r + 1, s), ring(r + 1, s + 1), ring(r, s + 1)],
                material,
            ));
        }
    }
    for s in 0..segments {
        mesh.faces.push(Face::with_material(
            vec![bottom, ring(rings - 1, s + 1), ring(rings - 1, s)],
            1,
        ));
    }
    mesh.ensure_edges();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_shape() {
        let mesh = subdivided_box(2);
        assert_eq!(mesh.face_count(), 24);
        assert_eq!(mesh.vertex_count(), 26);
        assert!(mesh.validate().is_ok());
        // The x = y = 0 corner is split into n edges
        assert_eq!(mesh.sharp_edge_count(), 2);
        assert!(mesh.edges.iter().any(|e| e.crease > 0.0));
    }

    #[test]
    fn test_sphere_shape() {
        let mesh = noisy_sphere(8, 12, 1);
        assert_eq!(mesh.vertex_count(), 2 + 7 * 12);
        assert_eq!(mesh.face_count(), 12 * 8);
        assert_eq!(mesh.materials.len(), 2);
        assert!(mesh.validate().is_ok());
    }
}
