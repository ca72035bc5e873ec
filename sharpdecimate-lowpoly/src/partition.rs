//! Material-partitioned decimation
//!
//! Each material region is cut out as its own mesh, decimated at a ratio
//! picked from the material name, and the results are merged back into a
//! single mesh with a single material.

use crate::classify::classify;
use crate::engine::DecimationEngine;
use crate::restore::{apply_angle_pass, restore, RestoreOptions, RestoreStats, AUTO_SMOOTH_ANGLE};
use serde::{Deserialize, Serialize};
use sharpdecimate_core::{DecimationConfig, EdgeKey, Error, Face, Material, PolyMesh, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Materials whose name contains this keep `high_detail_ratio` of their faces
pub const HIGH_DETAIL_MARKER: &str = "HighDetail";

/// Ratio a material region is decimated at
pub fn ratio_for_material(material: &Material, config: &DecimationConfig) -> f32 {
    if material.name.contains(HIGH_DETAIL_MARKER) {
        config.high_detail_ratio
    } else {
        config.low_detail_ratio
    }
}

/// Cut out the faces using material `slot`.
///
/// Vertices are compacted in order of first use and edges keep their
/// smooth flag and crease. The part has a single material slot holding
/// `material`. Returns `None` when no face uses the slot.
pub fn extract_partition(mesh: &PolyMesh, slot: usize, material: &Material) -> Option<PolyMesh> {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut part = PolyMesh::new().with_name(format!("{}_{}", mesh.name, material.name));

    for face in mesh.faces.iter().filter(|f| f.material_index == slot) {
        let vertices = face
            .vertices
            .iter()
            .map(|&v| {
                *remap.entry(v).or_insert_with(|| part.add_vertex(mesh.vertices[v]))
            })
            .collect();
        part.faces.push(Face::with_material(vertices, 0));
    }
    if part.faces.is_empty() {
        return None;
    }

    let used: HashSet<EdgeKey> = mesh
        .faces
        .iter()
        .filter(|f| f.material_index == slot)
        .flat_map(|f| f.edge_keys())
        .collect();
    for edge in mesh.edges.iter().filter(|e| used.contains(&e.key())) {
        let mut carried = *edge;
        carried.vertices = [remap[&edge.vertices[0]], remap[&edge.vertices[1]]];
        part.edges.push(carried);
    }
    part.ensure_edges();
    part.materials = vec![Some(material.clone())];
    Some(part)
}

/// One decimated material region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub slot: usize,
    pub material: String,
    pub ratio: f32,
    pub original_faces: usize,
    pub final_faces: usize,
    pub used_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct PartitionedMesh {
    pub mesh: PolyMesh,
    pub parts: Vec<PartitionSummary>,
    /// Transfer counts summed over the parts; the angle count is taken
    /// from the merged mesh
    pub restore: RestoreStats,
}

/// Decimate every populated material slot of `mesh` at its own ratio and
/// merge the results.
///
/// Fails with [`Error::InvalidData`] when `mesh` breaks its structural
/// invariants and with [`Error::Partition`] when no slot has faces; any
/// other error from a part is passed through.
pub fn decimate_by_material(
    mesh: &PolyMesh,
    config: &DecimationConfig,
    engine: &DecimationEngine,
) -> Result<PartitionedMesh> {
    mesh.validate()?;
    let options = RestoreOptions::from(config);
    let mut reduced_parts = Vec::new();
    let mut summaries = Vec::new();
    let mut stats = RestoreStats::default();

    for (slot, material) in mesh.materials.iter().enumerate() {
        let Some(material) = material else {
            continue;
        };
        let Some(part) = extract_partition(mesh, slot, material) else {
            debug!(slot, material = %material.name, "material slot has no faces");
            continue;
        };

        let ratio = ratio_for_material(material, config);
        let protection = classify(&part, config.sharp_angle_degrees);
        let mut decimation = engine.decimate(&part, ratio)?;
        stats += restore(&mut decimation.mesh, &protection, &options);

        info!(
            slot,
            material = %material.name,
            ratio,
            "partition {}",
            decimation
        );
        summaries.push(PartitionSummary {
            slot,
            material: material.name.clone(),
            ratio,
            original_faces: decimation.original_faces,
            final_faces: decimation.final_faces,
            used_fallback: decimation.used_fallback,
        });
        reduced_parts.push((material.clone(), decimation.mesh));
    }

    let mut merged = merge_partitions(reduced_parts)
        .ok_or_else(|| Error::Partition("no material slot has any faces".to_string()))?;
    merged.name = mesh.name.clone();
    stats.angle_edges = apply_angle_pass(&mut merged, config.sharp_angle_degrees);

    Ok(PartitionedMesh {
        mesh: merged,
        parts: summaries,
        restore: stats,
    })
}

/// Concatenate decimated parts into one mesh using the first part's
/// material for every face. `None` if there are no parts.
fn merge_partitions(parts: Vec<(Material, PolyMesh)>) -> Option<PolyMesh> {
    let first_material = parts.first().map(|(material, _)| material.clone())?;

    let mut merged = PolyMesh::new();
    for (_, part) in parts {
        let offset = merged.vertices.len();
        merged.vertices.extend(part.vertices);
        merged.edges.extend(part.edges.into_iter().map(|mut edge| {
            edge.vertices = edge.vertices.map(|v| v + offset);
            edge
        }));
        merged.faces.extend(part.faces.into_iter().map(|face| {
            Face::with_material(face.vertices.into_iter().map(|v| v + offset).collect(), 0)
        }));
    }
    merged.materials = vec![Some(first_material)];
    merged.auto_smooth_angle = Some(AUTO_SMOOTH_ANGLE);
    Some(merged)
}
