//! Decimation settings

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings for a low-poly generation run.
///
/// Defaults match the add-on's panel: keep 30% of the faces, protect
/// edges sharper than 75°, honour manual sharp marks and creases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecimationConfig {
    /// Fraction of faces to keep in standard mode, in (0, 1)
    pub target_ratio: f32,
    /// Dihedral angle in degrees above which an edge is kept sharp
    pub sharp_angle_degrees: f32,
    /// Carry manually marked sharp edges onto the result
    pub keep_manual_sharp: bool,
    /// Carry crease weights onto the result
    pub keep_crease: bool,
    /// Decimate each material region with its own ratio
    pub use_material_partitioning: bool,
    /// Ratio for materials whose name contains "HighDetail"
    pub high_detail_ratio: f32,
    /// Ratio for every other material
    pub low_detail_ratio: f32,
}

impl Default for DecimationConfig {
    fn default() -> Self {
        Self {
            target_ratio: 0.3,
            sharp_angle_degrees: 75.0,
            keep_manual_sharp: true,
            keep_crease: true,
            use_material_partitioning: false,
            high_detail_ratio: 0.8,
            low_detail_ratio: 0.2,
        }
    }
}

impl DecimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_ratio(mut self, ratio: f32) -> Self {
        self.target_ratio = ratio;
        self
    }

    pub fn with_sharp_angle(mut self, degrees: f32) -> Self {
        self.sharp_angle_degrees = degrees;
        self
    }

    pub fn with_keep_manual_sharp(mut self, keep: bool) -> Self {
        self.keep_manual_sharp = keep;
        self
    }

    pub fn with_keep_crease(mut self, keep: bool) -> Self {
        self.keep_crease = keep;
        self
    }

    /// Enable material partitioning with the given per-class ratios
    pub fn with_material_partitioning(mut self, high_detail_ratio: f32, low_detail_ratio: f32) -> Self {
        self.use_material_partitioning = true;
        self.high_detail_ratio = high_detail_ratio;
        self.low_detail_ratio = low_detail_ratio;
        self
    }

    /// Check the ratio and angle ranges
    pub fn validate(&self) -> Result<()> {
        for (name, ratio) in [
            ("target_ratio", self.target_ratio),
            ("high_detail_ratio", self.high_detail_ratio),
            ("low_detail_ratio", self.low_detail_ratio),
        ] {
            if !(ratio > 0.0 && ratio < 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be strictly between 0 and 1, got {}",
                    name, ratio
                )));
            }
        }
        if !(0.0..=180.0).contains(&self.sharp_angle_degrees) {
            return Err(Error::InvalidConfig(format!(
                "sharp_angle_degrees must be within [0, 180], got {}",
                self.sharp_angle_degrees
            )));
        }
        Ok(())
    }
}
