//! Planet configuration loaded from TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::geometry::{HeightSource, MAX_RESOLUTION};
use crate::layers::{LayerConfig, LayerId, LayerPipeline};
use crate::lod::{LodController, RebuildMode};
use crate::noise::{noise_seed, BatchHeightGenerator, FractalNoiseConfig};
use crate::terrain::ModifierStack;

/// Errors raised while loading or validating a [`PlanetConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which height function drives the planet surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightModel {
    /// The full layer pipeline (rocky surface over tectonics and base noise).
    #[default]
    Layers,
    /// The warped, terraced modifier stack.
    TerracedStack,
    /// Whole-face fractal buffers from the batch backend.
    Batch,
    /// A perfect sphere.
    Flat,
}

/// Everything needed to build a [`crate::Planet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub seed: u64,
    pub radius: f32,
    /// Grid cells per face edge at LOD level 0.
    pub base_resolution: u32,
    /// Descending camera distances at which detail increases.
    pub lod_thresholds: Vec<f32>,
    pub rebuild_mode: RebuildMode,
    pub height_model: HeightModel,
    /// Layers switched off at startup.
    pub disabled_layers: Vec<LayerId>,
    pub layers: LayerConfig,
    /// Batch backend settings; the seed is always taken from `seed`.
    pub batch: FractalNoiseConfig,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: 1234,
            radius: 1.0,
            base_resolution: 16,
            lod_thresholds: LodController::default().thresholds().to_vec(),
            rebuild_mode: RebuildMode::default(),
            height_model: HeightModel::default(),
            disabled_layers: Vec::new(),
            layers: LayerConfig::default(),
            batch: FractalNoiseConfig::default(),
        }
    }
}

impl PlanetConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::Invalid(format!("radius must be positive, got {}", self.radius)));
        }
        if !(1..=MAX_RESOLUTION).contains(&self.base_resolution) {
            return Err(ConfigError::Invalid(format!(
                "base_resolution must be within [1, {}], got {}",
                MAX_RESOLUTION, self.base_resolution
            )));
        }
        if self.lod_thresholds.windows(2).any(|w| w[0] < w[1]) {
            return Err(ConfigError::Invalid(format!(
                "lod_thresholds must be descending, got {:?}",
                self.lod_thresholds
            )));
        }
        let fraction = self.layers.tectonics.continental_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigError::Invalid(format!(
                "continental_fraction must be within [0, 1], got {}",
                fraction
            )));
        }
        if self.layers.tectonics.effect_radius <= 0.0 {
            return Err(ConfigError::Invalid("effect_radius must be positive".into()));
        }
        Ok(())
    }

    pub fn lod(&self) -> LodController {
        LodController::new(self.lod_thresholds.clone())
    }

    /// The layer pipeline with `disabled_layers` switched off.
    pub fn pipeline(&self) -> LayerPipeline {
        let mut pipeline = LayerPipeline::with_config(self.seed, self.layers.clone());
        for &id in &self.disabled_layers {
            pipeline.set_enabled(id, false);
        }
        pipeline
    }

    pub fn batch_config(&self) -> FractalNoiseConfig {
        FractalNoiseConfig {
            seed: noise_seed(self.seed),
            ..self.batch.clone()
        }
    }

    /// Height source for the configured model.
    pub fn height_source(&self) -> HeightSource {
        match self.height_model {
            HeightModel::Layers => HeightSource::function(self.pipeline()),
            HeightModel::TerracedStack => HeightSource::function(ModifierStack::terraced(self.seed)),
            HeightModel::Batch => HeightSource::face_buffers(BatchHeightGenerator::new(self.batch_config())),
            HeightModel::Flat => HeightSource::Flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = PlanetConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlanetConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = PlanetConfig::from_toml_str(
            r#"
            seed = 42
            height_model = "terraced-stack"
            rebuild_mode = "inline"
            disabled_layers = ["rocky", "cloudFlow"]

            [layers.base]
            octaves = 3

            [layers.tectonics]
            plate_count = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.height_model, HeightModel::TerracedStack);
        assert_eq!(config.rebuild_mode, RebuildMode::Inline);
        assert_eq!(config.disabled_layers, vec![LayerId::Rocky, LayerId::CloudFlow]);
        assert_eq!(config.layers.base.octaves, 3);
        assert_eq!(config.layers.base.frequency, 1.2);
        assert_eq!(config.layers.tectonics.plate_count, 6);
        assert_eq!(config.layers.cliff.boost, 2.0);

        let pipeline = config.pipeline();
        assert!(!pipeline.is_enabled(LayerId::Rocky));
        assert!(pipeline.is_enabled(LayerId::Elevation));
        assert_eq!(pipeline.plate_field().len(), 6);
    }

    #[test]
    fn test_unknown_layer_is_rejected() {
        let err = PlanetConfig::from_toml_str(r#"disabled_layers = ["lava"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values() {
        for text in [
            "radius = -1.0",
            "base_resolution = 0",
            "base_resolution = 100000",
            "lod_thresholds = [5.0, 10.0]",
            "[layers.tectonics]\ncontinental_fraction = 1.5",
        ] {
            let err = PlanetConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{} -> {:?}", text, err);
        }
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = PlanetConfig::default();
        config.seed = 9;
        config.height_model = HeightModel::Batch;
        let text = config.to_toml_string().unwrap();
        assert_eq!(PlanetConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = PlanetConfig::load("/nonexistent/planet.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_height_sources() {
        let mut config = PlanetConfig::default();
        for (model, kind) in [
            (HeightModel::Layers, "function"),
            (HeightModel::TerracedStack, "function"),
            (HeightModel::Batch, "face-buffers"),
            (HeightModel::Flat, "flat"),
        ] {
            config.height_model = model;
            assert_eq!(config.height_source().kind(), kind);
        }
        assert_eq!(config.batch_config().seed, 1234);
    }
}
