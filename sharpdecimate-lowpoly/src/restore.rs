//! Sharp edge restoration after decimation
//!
//! Decimation renumbers vertices and edges, so protection is found again
//! by geometry: a reduced edge whose endpoints sit where a protected source
//! edge's endpoints were inherits its manual sharp mark and crease. Angle
//! protection is simply recomputed on the reduced mesh.

use crate::classify::ProtectionSet;
use serde::{Deserialize, Serialize};
use sharpdecimate_core::{segment_key, DecimationConfig, MeshTopology, PolyMesh, PositionKey};
use std::collections::HashMap;
use std::ops::AddAssign;
use tracing::debug;

/// Decimal digits two endpoints must agree on to match
pub const MATCH_DECIMALS: i32 = 4;

/// Auto-smooth angle set on restored meshes, so shading follows the
/// sharp flags alone
pub const AUTO_SMOOTH_ANGLE: f32 = 180.0;

/// What the restorer carries over
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreOptions {
    pub sharp_angle_degrees: f32,
    pub keep_manual_sharp: bool,
    pub keep_crease: bool,
}

impl From<&DecimationConfig> for RestoreOptions {
    fn from(config: &DecimationConfig) -> Self {
        Self {
            sharp_angle_degrees: config.sharp_angle_degrees,
            keep_manual_sharp: config.keep_manual_sharp,
            keep_crease: config.keep_crease,
        }
    }
}

/// Edges touched by one restore pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreStats {
    /// Edges marked sharp by the angle pass
    pub angle_edges: usize,
    /// Edges that received a manual sharp mark from the source
    pub transferred_sharp: usize,
    /// Edges that received a crease weight from the source
    pub transferred_crease: usize,
}

impl AddAssign for RestoreStats {
    fn add_assign(&mut self, other: Self) {
        self.angle_edges += other.angle_edges;
        self.transferred_sharp += other.transferred_sharp;
        self.transferred_crease += other.transferred_crease;
    }
}

/// Mark every manifold edge sharper than `sharp_angle_degrees` as not
/// smooth. Returns how many edges exceed the angle.
pub fn apply_angle_pass(mesh: &mut PolyMesh, sharp_angle_degrees: f32) -> usize {
    let topology = MeshTopology::new(mesh);
    let mut count = 0;
    for (ei, edge) in mesh.edges.iter_mut().enumerate() {
        if topology
            .dihedral_angle(ei)
            .is_some_and(|angle| angle > sharp_angle_degrees)
        {
            edge.smooth = false;
            count += 1;
        }
    }
    count
}

/// Reapply `protection`, classified on the source mesh, to `reduced`.
///
/// Every smooth flag is reset first, so running this twice gives the same
/// mesh as running it once.
pub fn restore(
    reduced: &mut PolyMesh,
    protection: &ProtectionSet,
    options: &RestoreOptions,
) -> RestoreStats {
    for edge in &mut reduced.edges {
        edge.smooth = true;
    }

    let mut transferable: HashMap<(PositionKey, PositionKey), (bool, Option<f32>)> = HashMap::new();
    for protected in protection.iter() {
        let sharp = protected.tags.manual_sharp && options.keep_manual_sharp;
        let crease = (protected.tags.crease && options.keep_crease).then_some(protected.crease);
        if !sharp && crease.is_none() {
            continue;
        }
        // Source edges that quantize to one segment share their tags
        let [a, b] = &protected.endpoints;
        transferable
            .entry(segment_key(a, b, MATCH_DECIMALS))
            .and_modify(|(merged_sharp, merged_crease)| {
                *merged_sharp |= sharp;
                *merged_crease = match (*merged_crease, crease) {
                    (Some(x), Some(y)) => Some(x.max(y)),
                    (x, y) => x.or(y),
                };
            })
            .or_insert((sharp, crease));
    }

    let mut stats = RestoreStats::default();
    if !transferable.is_empty() {
        let vertices = &reduced.vertices;
        for edge in &mut reduced.edges {
            let [a, b] = edge.vertices;
            let (Some(pa), Some(pb)) = (vertices.get(a), vertices.get(b)) else {
                continue;
            };
            let key = segment_key(pa, pb, MATCH_DECIMALS);
            let Some(&(sharp, crease)) = transferable.get(&key) else {
                continue;
            };
            if sharp {
                edge.smooth = false;
                stats.transferred_sharp += 1;
            }
            if let Some(weight) = crease {
                edge.crease = weight;
                stats.transferred_crease += 1;
            }
        }
    }

    stats.angle_edges = apply_angle_pass(reduced, options.sharp_angle_degrees);
    reduced.auto_smooth_angle = Some(AUTO_SMOOTH_ANGLE);

    debug!(
        angle = stats.angle_edges,
        sharp = stats.transferred_sharp,
        crease = stats.transferred_crease,
        "restored protected edges"
    );
    stats
}
