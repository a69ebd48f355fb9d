//! Configuration for the synthetic plate field.

use serde::{Deserialize, Serialize};

/// Configuration parameters for plate generation and boundary effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TectonicConfig {
    /// Number of plates scattered over the sphere.
    pub plate_count: usize,
    /// Default gap (in unit-sphere distance) under which a point counts as
    /// lying on a boundary.
    pub boundary_radius: f32,
    /// Width of the zone where the plate modifier reshapes height.
    pub effect_radius: f32,
    /// Probability that a plate is continental.
    pub continental_fraction: f32,
}

impl Default for TectonicConfig {
    fn default() -> Self {
        Self {
            plate_count: 20,
            boundary_radius: 0.1,
            effect_radius: 0.05,
            continental_fraction: 0.35,
        }
    }
}

impl TectonicConfig {
    /// Fewer, larger plates.
    pub fn sparse() -> Self {
        Self {
            plate_count: 8,
            ..Default::default()
        }
    }

    /// Many small plates with wider boundary zones.
    pub fn active() -> Self {
        Self {
            plate_count: 32,
            effect_radius: 0.08,
            ..Default::default()
        }
    }
}
