//! Command-line front end for the low-poly generator.
//!
//! Builds a procedural mesh, reduces it and prints the summary line.
//! Settings come from an optional JSON file and are then overridden by
//! flags. Set `RUST_LOG=debug` to see the pipeline's log output.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sharpdecimate_core::{DecimationConfig, PolyMesh};
use sharpdecimate_demos::{noisy_sphere, subdivided_box};
use sharpdecimate_lowpoly::{LowPolyGenerator, Progress};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lowpoly")]
#[command(author, version, about = "Sharp-edge preserving polygon reduction", long_about = None)]
struct Cli {
    /// Shape to generate
    #[arg(short, long, value_enum, default_value_t = Shape::Sphere)]
    shape: Shape,

    /// Subdivision level of the shape
    #[arg(short = 'n', long, default_value = "24")]
    detail: usize,

    /// JSON file holding a DecimationConfig
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fraction of faces to keep
    #[arg(short, long)]
    ratio: Option<f32>,

    /// Dihedral angle in degrees above which edges stay sharp
    #[arg(short, long)]
    angle: Option<f32>,

    /// Decimate each material at its own ratio
    #[arg(short, long)]
    partition: bool,

    /// Drop manually marked sharp edges
    #[arg(long)]
    no_manual_sharp: bool,

    /// Drop crease weights
    #[arg(long)]
    no_crease: bool,

    /// Write the full result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Box,
    Sphere,
}

impl Cli {
    fn load_config(&self) -> Result<DecimationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => DecimationConfig::default(),
        };
        if let Some(ratio) = self.ratio {
            config.target_ratio = ratio;
        }
        if let Some(angle) = self.angle {
            config.sharp_angle_degrees = angle;
        }
        if self.partition {
            config.use_material_partitioning = true;
        }
        if self.no_manual_sharp {
            config.keep_manual_sharp = false;
        }
        if self.no_crease {
            config.keep_crease = false;
        }
        Ok(config)
    }

    fn build_mesh(&self) -> PolyMesh {
        match self.shape {
            Shape::Box => subdivided_box(self.detail.max(1)),
            Shape::Sphere => noisy_sphere(self.detail.max(3), self.detail.max(3) * 2, 7),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let mesh = cli.build_mesh();

    println!(
        "{}: {} vertices, {} faces, {} sharp edges",
        mesh.name,
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.sharp_edge_count()
    );

    let progress = Progress::new(|current, total, message| {
        println!("  [{:>3}/{}] {}", current, total, message);
    });
    let generator = LowPolyGenerator::new(config).with_progress(progress);
    let result = generator
        .generate(&mesh)
        .with_context(|| format!("reducing {}", mesh.name))?;

    println!("{}", result.summary());
    println!(
        "  mode: {}, sharp by angle: {}, sharp carried: {}, creases carried: {}",
        result.mode,
        result.restore.angle_edges,
        result.restore.transferred_sharp,
        result.restore.transferred_crease
    );
    for part in &result.partitions {
        println!(
            "  {}: {} → {} faces at {:.2}",
            part.material, part.original_faces, part.final_faces, part.ratio
        );
    }
    if !result.post_check.is_valid() {
        println!("  integrity: {}", result.post_check);
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Result written to {}", path.display());
    }

    Ok(())
}
