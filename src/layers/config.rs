//! Parameters of the layer pipeline.

use serde::{Deserialize, Serialize};

use crate::tectonics::TectonicConfig;

/// Base terrain noise: a domain warp followed by FBM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseNoiseParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub octaves: u32,
    pub warp_intensity: f32,
}

impl Default for BaseNoiseParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 1.2,
            octaves: 5,
            warp_intensity: 0.2,
        }
    }
}

impl BaseNoiseParams {
    pub fn apply(&mut self, update: &BaseNoiseUpdate) {
        if let Some(amplitude) = update.amplitude {
            self.amplitude = amplitude;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(octaves) = update.octaves {
            self.octaves = octaves;
        }
        if let Some(warp_intensity) = update.warp_intensity {
            self.warp_intensity = warp_intensity;
        }
    }
}

/// Partial update of [`BaseNoiseParams`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseNoiseUpdate {
    pub amplitude: Option<f32>,
    pub frequency: Option<f32>,
    pub octaves: Option<u32>,
    pub warp_intensity: Option<f32>,
}

/// Slope-driven amplification of the rocky layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliffParams {
    pub threshold: f32,
    pub boost: f32,
}

impl Default for CliffParams {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            boost: 2.0,
        }
    }
}

impl CliffParams {
    pub fn apply(&mut self, update: &CliffUpdate) {
        if let Some(threshold) = update.threshold {
            self.threshold = threshold;
        }
        if let Some(boost) = update.boost {
            self.boost = boost;
        }
    }
}

/// Partial update of [`CliffParams`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CliffUpdate {
    pub threshold: Option<f32>,
    pub boost: Option<f32>,
}

/// Everything a [`super::LayerPipeline`] needs besides its seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub base: BaseNoiseParams,
    pub cliff: CliffParams,
    pub tectonics: TectonicConfig,
}
