//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A vertex position snapped to a fixed number of decimal digits.
///
/// Two positions with the same key are treated as coincident. Used for
/// overlap detection and for matching edges across a decimation step,
/// where vertex indices are not stable but untouched positions are.
pub type PositionKey = [i64; 3];

/// Quantize a position to `decimals` decimal digits.
pub fn position_key(p: &Point3f, decimals: i32) -> PositionKey {
    let scale = 10f64.powi(decimals);
    [
        (p.x as f64 * scale).round() as i64,
        (p.y as f64 * scale).round() as i64,
        (p.z as f64 * scale).round() as i64,
    ]
}

/// Order-independent key for a segment between two quantized positions.
pub fn segment_key(a: &Point3f, b: &Point3f, decimals: i32) -> (PositionKey, PositionKey) {
    let ka = position_key(a, decimals);
    let kb = position_key(b, decimals);
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}
