//! Low-poly generation entry points
//!
//! Runs the full pipeline on a borrowed mesh: preflight, integrity
//! pre-check, standard or material-partitioned decimation with sharp edge
//! restoration, and an integrity post-check.

use crate::classify::classify;
use crate::engine::{reduction_percent, DecimationEngine};
use crate::integrity::{integrity_report, preflight, IntegrityReport};
use crate::partition::{decimate_by_material, PartitionSummary};
use crate::progress::Progress;
use crate::restore::{restore, RestoreOptions, RestoreStats};
use serde::{Deserialize, Serialize};
use sharpdecimate_core::{DecimationConfig, PolyMesh, Result};
use std::fmt;
use tracing::{info, warn};

/// Prefix given to the name of every generated mesh
pub const RESULT_NAME_PREFIX: &str = "Low_";

/// How the result was actually produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecimationMode {
    /// Whole-mesh decimation at `target_ratio`
    Standard,
    /// Per-material decimation, merged
    MaterialPartitioned,
    /// Partitioning was requested but failed; whole-mesh decimation was used
    PartitionFallback,
}

impl fmt::Display for DecimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecimationMode::Standard => "standard",
            DecimationMode::MaterialPartitioned => "material partitioned",
            DecimationMode::PartitionFallback => "standard (partition fallback)",
        };
        f.write_str(label)
    }
}

/// The generated mesh and what happened on the way
#[derive(Debug, Clone, Serialize)]
pub struct LowPolyResult {
    pub mesh: PolyMesh,
    pub mode: DecimationMode,
    pub original_faces: usize,
    pub final_faces: usize,
    pub original_vertices: usize,
    pub final_vertices: usize,
    /// Whether any reduction fell back to the secondary simplifier
    pub used_fallback: bool,
    pub restore: RestoreStats,
    pub pre_check: IntegrityReport,
    pub post_check: IntegrityReport,
    /// Empty unless `mode` is [`DecimationMode::MaterialPartitioned`]
    pub partitions: Vec<PartitionSummary>,
}

impl LowPolyResult {
    pub fn reduction_percent(&self) -> f32 {
        reduction_percent(self.original_faces, self.final_faces)
    }

    /// One-line report, e.g. `Low_Cube | Polys: 600 → 180 (70.0% reduction)`
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} | Polys: {} → {} ({:.1}% reduction)",
            self.mesh.name,
            self.original_faces,
            self.final_faces,
            self.reduction_percent()
        );
        if !self.post_check.is_valid() {
            line.push_str(" | Check mesh integrity");
        }
        line
    }
}

/// Configurable low-poly generator
#[derive(Debug, Default)]
pub struct LowPolyGenerator {
    config: DecimationConfig,
    engine: DecimationEngine,
    progress: Progress,
}

impl LowPolyGenerator {
    pub fn new(config: DecimationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_engine(mut self, engine: DecimationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &DecimationConfig {
        &self.config
    }

    /// Generate a low-poly copy of `mesh`. The source is never modified.
    ///
    /// Material partitioning only runs when the config asks for it and the
    /// mesh has at least one populated material slot.
    pub fn generate(&self, mesh: &PolyMesh) -> Result<LowPolyResult> {
        self.config.validate()?;
        mesh.validate()?;
        preflight(mesh)?;
        self.progress.checkpoint(10, "Mesh validated");

        let pre_check = integrity_report(mesh);
        if !pre_check.is_valid() {
            warn!(mesh = %mesh.name, "mesh issues before decimation: {}", pre_check);
        }
        self.progress.checkpoint(20, "Integrity pre-check done");

        self.progress.checkpoint(30, "Decimating");
        let (mut reduced, mode, used_fallback, restore_stats, partitions) =
            if self.config.use_material_partitioning && mesh.has_materials() {
                match decimate_by_material(mesh, &self.config, &self.engine) {
                    Ok(partitioned) => {
                        let used_fallback = partitioned.parts.iter().any(|p| p.used_fallback);
                        (
                            partitioned.mesh,
                            DecimationMode::MaterialPartitioned,
                            used_fallback,
                            partitioned.restore,
                            partitioned.parts,
                        )
                    }
                    Err(err) => {
                        warn!(
                            mesh = %mesh.name,
                            error = %err,
                            "material partitioning failed, using standard decimation"
                        );
                        let (reduced, used_fallback, stats) = self.decimate_standard(mesh)?;
                        let mode = DecimationMode::PartitionFallback;
                        (reduced, mode, used_fallback, stats, Vec::new())
                    }
                }
            } else {
                let (reduced, used_fallback, stats) = self.decimate_standard(mesh)?;
                (reduced, DecimationMode::Standard, used_fallback, stats, Vec::new())
            };
        self.progress.checkpoint(80, "Sharp edges restored");

        reduced.name = format!("{}{}", RESULT_NAME_PREFIX, mesh.name);
        let post_check = integrity_report(&reduced);
        if !post_check.is_valid() {
            warn!(mesh = %reduced.name, "mesh issues after decimation: {}", post_check);
        }
        self.progress.checkpoint(90, "Integrity post-check done");

        let result = LowPolyResult {
            mode,
            original_faces: mesh.face_count(),
            final_faces: reduced.face_count(),
            original_vertices: mesh.vertex_count(),
            final_vertices: reduced.vertex_count(),
            used_fallback,
            restore: restore_stats,
            pre_check,
            post_check,
            partitions,
            mesh: reduced,
        };
        info!(mode = %result.mode, "{}", result.summary());
        self.progress.checkpoint(100, "Done");
        Ok(result)
    }

    /// Classify on the source, decimate the whole mesh, restore
    fn decimate_standard(&self, mesh: &PolyMesh) -> Result<(PolyMesh, bool, RestoreStats)> {
        let protection = classify(mesh, self.config.sharp_angle_degrees);
        info!(
            mesh = %mesh.name,
            protected = protection.len(),
            "classified protected edges"
        );
        let mut decimation = self.engine.decimate(mesh, self.config.target_ratio)?;
        let stats = restore(
            &mut decimation.mesh,
            &protection,
            &RestoreOptions::from(&self.config),
        );
        Ok((decimation.mesh, decimation.used_fallback, stats))
    }
}

/// Generate a low-poly copy of `mesh` with the default engine.
pub fn generate_low_poly(mesh: &PolyMesh, config: &DecimationConfig) -> Result<LowPolyResult> {
    LowPolyGenerator::new(config.clone()).generate(mesh)
}
