//! Distance-based level-of-detail selection.

use serde::{Deserialize, Serialize};

use crate::geometry::MAX_RESOLUTION;

/// Maps camera distance to a detail level.
///
/// Thresholds are in descending order. Level 0 is the coarsest; every
/// threshold the camera is inside of adds one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodController {
    thresholds: Vec<f32>,
}

impl Default for LodController {
    fn default() -> Self {
        Self::new(vec![50.0, 25.0, 10.0, 5.0])
    }
}

impl LodController {
    pub fn new(thresholds: Vec<f32>) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Finest level this controller can return.
    pub fn max_level(&self) -> u32 {
        self.thresholds.len() as u32
    }

    /// Index of the first threshold `distance` exceeds, or the threshold
    /// count when it exceeds none.
    pub fn target_level(&self, distance: f32) -> u32 {
        self.thresholds
            .iter()
            .position(|&t| distance > t)
            .unwrap_or(self.thresholds.len()) as u32
    }

    /// Grid resolution for `level`: the base resolution doubled per level,
    /// kept within `1..=MAX_RESOLUTION` so it matches what the geometry
    /// builder actually emits.
    pub fn resolution_for(base_resolution: u32, level: u32) -> u32 {
        base_resolution
            .max(1)
            .saturating_mul(1u32.checked_shl(level).unwrap_or(u32::MAX))
            .min(MAX_RESOLUTION)
    }
}
