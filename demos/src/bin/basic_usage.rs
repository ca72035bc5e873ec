//! Basic usage of sharpdecimate
//!
//! Runs the same box through standard decimation and the sphere through
//! material-partitioned decimation.

use anyhow::Result;
use sharpdecimate_core::DecimationConfig;
use sharpdecimate_demos::{noisy_sphere, subdivided_box};
use sharpdecimate_lowpoly::{classify, generate_low_poly, integrity_report};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("sharpdecimate basic usage");
    println!("=========================");

    let cube = subdivided_box(8);
    let protection = classify(&cube, 75.0);
    println!(
        "\n{}: {} faces, {} protected edges ({} by angle, {} marked sharp, {} creased)",
        cube.name,
        cube.face_count(),
        protection.len(),
        protection.angle_edges().count(),
        protection.manual_sharp_edges().count(),
        protection.creased_edges().count()
    );
    println!("Integrity: {}", integrity_report(&cube));

    let standard = generate_low_poly(&cube, &DecimationConfig::default().with_target_ratio(0.25))?;
    println!("{}", standard.summary());
    println!("Sharp edges after restore: {}", standard.mesh.sharp_edge_count());

    let sphere = noisy_sphere(16, 32, 42);
    let config = DecimationConfig::default().with_material_partitioning(0.8, 0.2);
    let partitioned = generate_low_poly(&sphere, &config)?;
    println!("\n{}", partitioned.summary());
    for part in &partitioned.partitions {
        println!(
            "  {} kept {:.0}%: {} → {} faces",
            part.material,
            part.ratio * 100.0,
            part.original_faces,
            part.final_faces
        );
    }

    info!(mode = %partitioned.mode, "basic usage finished");
    Ok(())
}
