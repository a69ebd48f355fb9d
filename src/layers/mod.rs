//! Named signal layers over the sphere.
//!
//! The pipeline evaluates a fixed sequence of layers at each point: base
//! noise, plate tectonics, elevation, then climate signals (moisture,
//! temperature, biome, vegetation, clouds) and finally the slope-boosted
//! rocky surface. Each layer reads only layers that come before it.

mod biome;
mod config;
mod layer;

use std::sync::Arc;

use glam::Vec3;
use tracing::debug;

pub use biome::Biome;
pub use config::{BaseNoiseParams, BaseNoiseUpdate, CliffParams, CliffUpdate, LayerConfig};
pub use layer::{LayerId, LayerSample, LayerValue};

use crate::geometry::HeightFunction;
use crate::noise::{noise_seed, NoiseSource, SimplexNoise};
use crate::tectonics::{BoundaryInfo, PlateField, PlateModifier};
use crate::terrain::{clamp_height, Modifier, ModifierStack};

/// Central-difference step for the rocky layer's slope estimate.
const SLOPE_EPSILON: f32 = 0.002;
/// Moisture noise frequency.
const MOISTURE_SCALE: f32 = 0.5;

type EnabledMask = [bool; LayerId::COUNT];

/// The layer stack of one planet.
#[derive(Debug, Clone)]
pub struct LayerPipeline {
    seed: u64,
    config: LayerConfig,
    noise: Arc<dyn NoiseSource>,
    base: ModifierStack,
    plates: PlateModifier,
    enabled: EnabledMask,
}

impl LayerPipeline {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, LayerConfig::default())
    }

    pub fn with_config(seed: u64, config: LayerConfig) -> Self {
        let noise: Arc<dyn NoiseSource> = Arc::new(SimplexNoise::new(noise_seed(seed)));
        let field = Arc::new(PlateField::from_config(seed, &config.tectonics));
        let plates = PlateModifier::new(field, config.tectonics.effect_radius);
        let base = base_stack(seed, &noise, &config.base);

        debug!(seed, plates = plates.field().len(), "built layer pipeline");

        Self {
            seed,
            config,
            noise,
            base,
            plates,
            enabled: [true; LayerId::COUNT],
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn base_stack(&self) -> &ModifierStack {
        &self.base
    }

    pub fn plate_modifier(&self) -> &PlateModifier {
        &self.plates
    }

    pub fn plate_field(&self) -> &PlateField {
        self.plates.field()
    }

    pub fn is_enabled(&self, id: LayerId) -> bool {
        self.enabled[id.index()]
    }

    pub fn set_enabled(&mut self, id: LayerId, enabled: bool) {
        self.enabled[id.index()] = enabled;
    }

    /// Updates the given base noise parameters and rebuilds the base stack.
    pub fn set_base_noise_params(&mut self, update: BaseNoiseUpdate) {
        self.config.base.apply(&update);
        self.base = base_stack(self.seed, &self.noise, &self.config.base);
        debug!(?update, "updated base noise");
    }

    pub fn set_cliff_params(&mut self, update: CliffUpdate) {
        self.config.cliff.apply(&update);
        debug!(?update, "updated cliff parameters");
    }

    /// Evaluates every enabled layer at `p`.
    pub fn compute(&self, p: Vec3) -> LayerSample {
        self.compute_masked(p, &self.enabled)
    }

    pub fn compute_at(&self, x: f32, y: f32, z: f32) -> LayerSample {
        self.compute(Vec3::new(x, y, z))
    }

    /// Surface height at `p`: rocky if enabled, else elevation, else 0.
    pub fn height(&self, p: Vec3) -> f32 {
        self.compute(p).height()
    }

    /// How much `id` changes the height at `p`: the height with the layer
    /// enabled minus the height with it disabled, everything else unchanged.
    pub fn layer_influence(&self, id: LayerId, p: Vec3) -> f32 {
        let mut with = self.enabled;
        with[id.index()] = true;
        let mut without = self.enabled;
        without[id.index()] = false;
        self.compute_masked(p, &with).height() - self.compute_masked(p, &without).height()
    }

    /// Base noise with the plate modifier applied, clamped.
    pub fn compute_elevation(&self, p: Vec3) -> f32 {
        let base = self.base.height(p);
        clamp_height(self.plates.apply(p, base))
    }

    fn compute_masked(&self, p: Vec3, enabled: &EnabledMask) -> LayerSample {
        let mut sample = LayerSample::default();
        for id in LayerId::ALL {
            if enabled[id.index()] {
                let value = self.evaluate(id, p, &sample);
                sample.set(id, value);
            }
        }
        sample
    }

    fn evaluate(&self, id: LayerId, p: Vec3, sample: &LayerSample) -> LayerValue {
        use LayerValue::Scalar;

        match id {
            LayerId::BaseNoise => Scalar(self.base.height(p)),
            LayerId::Tectonics => {
                Scalar(self.plates.apply(p, sample.scalar_or_zero(LayerId::BaseNoise)))
            }
            LayerId::Elevation => {
                let base = sample.scalar_or_zero(LayerId::BaseNoise);
                let tectonics = sample.scalar_or_zero(LayerId::Tectonics);
                Scalar(clamp_height(base + tectonics))
            }
            LayerId::Moisture => Scalar(self.noise.sample(p * MOISTURE_SCALE)),
            LayerId::Temperature => {
                let elevation = sample.scalar_or_zero(LayerId::Elevation);
                Scalar((1.0 - p.y.abs()) - (1.0 + elevation).max(0.0) * 0.5)
            }
            LayerId::Biome => LayerValue::Biome(Biome::classify(
                sample.scalar_or_zero(LayerId::Temperature),
                sample.scalar_or_zero(LayerId::Moisture),
            )),
            LayerId::Vegetation => Scalar(sample.scalar_or_zero(LayerId::Moisture) * 0.5 + 0.5),
            LayerId::CloudDensity => {
                let moisture = sample.scalar_or_zero(LayerId::Moisture);
                let temperature = sample.scalar_or_zero(LayerId::Temperature);
                Scalar(moisture * (1.0 - temperature.abs()))
            }
            LayerId::CloudFlow => LayerValue::Flow(Vec3::new(
                self.noise.sample(Vec3::new(p.x, 0.0, 0.0)),
                0.0,
                self.noise.sample(Vec3::new(0.0, 0.0, p.z)),
            )),
            LayerId::Rocky => {
                let elevation = sample.scalar_or_zero(LayerId::Elevation);
                if self.slope(p) > self.config.cliff.threshold {
                    Scalar(clamp_height(elevation * self.config.cliff.boost))
                } else {
                    Scalar(elevation)
                }
            }
        }
    }

    /// Gradient magnitude of the plate-adjusted base field at `p`.
    ///
    /// The boundary lookup is done once at `p` and reused for all six
    /// offset samples.
    fn slope(&self, p: Vec3) -> f32 {
        let info = self.plates.boundary_info(p);
        let eps = SLOPE_EPSILON;
        let gradient = Vec3::new(
            self.adjusted(p + Vec3::X * eps, info.as_ref()) - self.adjusted(p - Vec3::X * eps, info.as_ref()),
            self.adjusted(p + Vec3::Y * eps, info.as_ref()) - self.adjusted(p - Vec3::Y * eps, info.as_ref()),
            self.adjusted(p + Vec3::Z * eps, info.as_ref()) - self.adjusted(p - Vec3::Z * eps, info.as_ref()),
        ) / (2.0 * eps);
        gradient.length()
    }

    fn adjusted(&self, q: Vec3, info: Option<&BoundaryInfo>) -> f32 {
        self.plates.apply_with_info(q, self.base.height(q), info)
    }
}

impl HeightFunction for LayerPipeline {
    fn height(&self, p: Vec3) -> f32 {
        LayerPipeline::height(self, p)
    }
}

fn base_stack(seed: u64, noise: &Arc<dyn NoiseSource>, params: &BaseNoiseParams) -> ModifierStack {
    ModifierStack::new(seed)
        .with(Modifier::domain_warp(noise.clone(), params.warp_intensity))
        .with(Modifier::fbm(noise.clone(), params.amplitude, params.frequency, params.octaves))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COORDS: [[f32; 3]; 3] = [[0.1, 0.2, 0.3], [0.4, -0.1, 0.2], [0.7, 0.3, -0.2]];

    fn points() -> impl Iterator<Item = Vec3> {
        COORDS.into_iter().map(Vec3::from_array)
    }

    #[test]
    fn test_all_layers_present_by_default() {
        let pipeline = LayerPipeline::new(1234);
        let sample = pipeline.compute_at(0.1, 0.2, 0.3);
        for id in LayerId::ALL {
            assert!(sample.contains(id), "missing layer {}", id);
        }
        assert!(sample.biome().is_some());
        assert_eq!(sample.cloud_flow().map(|f| f.y), Some(0.0));
    }

    #[test]
    fn test_independent_pipelines_agree() {
        let a = LayerPipeline::new(1234);
        let b = LayerPipeline::new(1234);
        for p in points() {
            assert_eq!(a.height(p).to_bits(), b.height(p).to_bits());
            assert_eq!(a.compute(p), b.compute(p));
        }
    }

    #[test]
    fn test_heights_in_range() {
        let pipeline = LayerPipeline::new(77);
        for i in 0..100 {
            let t = i as f32 * 0.61;
            let p = Vec3::new(t.cos(), (t * 0.3).sin(), t.sin()).normalize();
            let h = pipeline.height(p);
            assert!((-1.0..=1.0).contains(&h));
        }
    }

    #[test]
    fn test_layer_formulas() {
        let pipeline = LayerPipeline::new(99);
        let p = Vec3::new(0.4, -0.1, 0.2);
        let s = pipeline.compute(p);

        let base = s.scalar_or_zero(LayerId::BaseNoise);
        let tect = s.scalar_or_zero(LayerId::Tectonics);
        assert_eq!(s.scalar(LayerId::Elevation), Some(clamp_height(base + tect)));

        let m = s.scalar_or_zero(LayerId::Moisture);
        assert_eq!(s.scalar(LayerId::Vegetation), Some(m * 0.5 + 0.5));

        let elevation = s.scalar_or_zero(LayerId::Elevation);
        let t = (1.0 - 0.1) - (1.0 + elevation).max(0.0) * 0.5;
        assert!((s.scalar_or_zero(LayerId::Temperature) - t).abs() < 1e-6);
        assert_eq!(s.biome(), Some(Biome::classify(s.scalar_or_zero(LayerId::Temperature), m)));
    }

    #[test]
    fn test_disabled_layers_are_absent() {
        let mut pipeline = LayerPipeline::new(5);
        pipeline.set_enabled(LayerId::Rocky, false);
        pipeline.set_enabled(LayerId::Moisture, false);
        let p = Vec3::new(0.1, 0.2, 0.3);
        let s = pipeline.compute(p);

        assert!(!s.contains(LayerId::Rocky));
        assert!(!s.contains(LayerId::Moisture));
        assert_eq!(s.scalar(LayerId::Vegetation), Some(0.5));
        assert_eq!(pipeline.height(p), s.scalar_or_zero(LayerId::Elevation));
    }

    #[test]
    fn test_no_surface_layers_is_flat() {
        let mut pipeline = LayerPipeline::new(5);
        pipeline.set_enabled(LayerId::Rocky, false);
        pipeline.set_enabled(LayerId::Elevation, false);
        assert_eq!(pipeline.height(Vec3::new(0.3, 0.3, 0.3)), 0.0);
    }

    #[test]
    fn test_layer_influence_is_deterministic() {
        for p in points() {
            let a = LayerPipeline::new(1234);
            let b = LayerPipeline::new(1234);
            assert_eq!(
                a.layer_influence(LayerId::Tectonics, p),
                b.layer_influence(LayerId::Tectonics, p)
            );
        }
    }

    #[test]
    fn test_layer_influence_does_not_mutate() {
        let pipeline = LayerPipeline::new(8);
        let p = Vec3::new(0.7, 0.3, -0.2);
        let before = pipeline.compute(p);
        let _ = pipeline.layer_influence(LayerId::Elevation, p);
        assert_eq!(pipeline.compute(p), before);
        assert!(pipeline.is_enabled(LayerId::Elevation));
    }

    #[test]
    fn test_moisture_influence_on_height_is_zero() {
        let pipeline = LayerPipeline::new(8);
        for p in points() {
            assert_eq!(pipeline.layer_influence(LayerId::Moisture, p), 0.0);
        }
    }

    #[test]
    fn test_rocky_is_deterministic_with_cliff_params() {
        let mut a = LayerPipeline::new(1234);
        let mut b = LayerPipeline::new(1234);
        for pipeline in [&mut a, &mut b] {
            pipeline.set_cliff_params(CliffUpdate {
                threshold: Some(0.3),
                boost: Some(2.0),
            });
            pipeline.set_enabled(LayerId::Rocky, true);
        }
        for p in [Vec3::new(0.1, 0.2, 0.3), Vec3::new(0.4, 0.0, 0.2), Vec3::new(0.7, -0.3, 0.1)] {
            assert_eq!(a.height(p), b.height(p));
        }
    }

    #[test]
    fn test_rocky_boost_follows_threshold() {
        let mut pipeline = LayerPipeline::new(3);
        let p = Vec3::new(0.4, 0.0, 0.2);

        pipeline.set_cliff_params(CliffUpdate {
            threshold: Some(f32::MAX),
            boost: None,
        });
        let s = pipeline.compute(p);
        assert_eq!(s.scalar(LayerId::Rocky), s.scalar(LayerId::Elevation));

        pipeline.set_cliff_params(CliffUpdate {
            threshold: Some(-1.0),
            boost: Some(2.0),
        });
        let s = pipeline.compute(p);
        let expected = clamp_height(s.scalar_or_zero(LayerId::Elevation) * 2.0);
        assert_eq!(s.scalar(LayerId::Rocky), Some(expected));
    }

    #[test]
    fn test_base_noise_update_rebuilds_stack() {
        let mut pipeline = LayerPipeline::new(10);
        let p = Vec3::new(0.1, 0.2, 0.3);
        let before = pipeline.base_stack().height(p);

        pipeline.set_base_noise_params(BaseNoiseUpdate {
            amplitude: Some(0.0),
            ..Default::default()
        });
        assert_eq!(pipeline.config().base.amplitude, 0.0);
        assert_eq!(pipeline.config().base.octaves, 5);
        assert_eq!(pipeline.base_stack().height(p), 0.0);
        assert_ne!(before, 0.0);
    }

    #[test]
    fn test_compute_elevation_is_clamped_plate_field() {
        let pipeline = LayerPipeline::new(21);
        for p in points() {
            let base = pipeline.base_stack().height(p);
            let expected = clamp_height(pipeline.plate_modifier().apply(p, base));
            assert_eq!(pipeline.compute_elevation(p), expected);
        }
    }
}
