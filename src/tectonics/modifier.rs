//! Height adjustments along plate boundaries.

use std::sync::Arc;

use glam::Vec3;

use super::boundary::{BoundaryInfo, BoundaryKind};
use super::field::PlateField;
use crate::noise::{noise_seed, NoiseSource, SimplexNoise};

/// Rift depth and ridge height at the center of a boundary zone.
const RELIEF: f32 = 0.05;
/// Uplift along transform faults.
const TRANSFORM_RELIEF: f32 = 0.02;
/// Amplitude of the volcanic noise near convergent boundaries.
const VOLCANO_RELIEF: f32 = 0.1;
/// Spatial frequency of the volcanic noise.
const VOLCANO_FREQUENCY: f32 = 10.0;

/// Reshapes height near plate boundaries.
///
/// Divergent zones sink, convergent zones rise with volcanic roughness close
/// to the boundary line, and transform zones get a slight lift.
#[derive(Debug, Clone)]
pub struct PlateModifier {
    field: Arc<PlateField>,
    radius: f32,
    noise: Arc<dyn NoiseSource>,
}

impl PlateModifier {
    /// Creates a modifier with volcanic noise seeded from the field seed + 1.
    pub fn new(field: Arc<PlateField>, radius: f32) -> Self {
        let noise = Arc::new(SimplexNoise::new(noise_seed(field.seed().wrapping_add(1))));
        Self::with_noise(field, radius, noise)
    }

    pub fn with_noise(field: Arc<PlateField>, radius: f32, noise: Arc<dyn NoiseSource>) -> Self {
        Self { field, radius, noise }
    }

    pub fn field(&self) -> &Arc<PlateField> {
        &self.field
    }

    /// Width of the effect zone.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Boundary information at `p` using this modifier's effect radius.
    pub fn boundary_info(&self, p: Vec3) -> Option<BoundaryInfo> {
        self.field.boundary_info(p, self.radius)
    }

    pub fn apply(&self, p: Vec3, height: f32) -> f32 {
        self.apply_with_info(p, height, self.boundary_info(p).as_ref())
    }

    /// Applies the boundary effect from a precomputed lookup.
    pub fn apply_with_info(&self, p: Vec3, height: f32, info: Option<&BoundaryInfo>) -> f32 {
        let Some(info) = info else {
            return height;
        };
        let falloff = 1.0 - info.distance / self.radius;
        match info.kind {
            BoundaryKind::Divergent => height - falloff * RELIEF,
            BoundaryKind::Convergent => {
                let volcano = falloff.powi(4) * self.noise.sample(p * VOLCANO_FREQUENCY);
                height + falloff * RELIEF + volcano * VOLCANO_RELIEF
            }
            BoundaryKind::Transform => height + falloff * TRANSFORM_RELIEF,
        }
    }
}
