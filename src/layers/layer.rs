//! Layer identifiers and per-sample layer values.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::biome::Biome;

/// Named signal layers in evaluation order.
///
/// Each layer may read any layer earlier in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerId {
    BaseNoise,
    Tectonics,
    Elevation,
    Moisture,
    Temperature,
    Biome,
    Vegetation,
    CloudDensity,
    CloudFlow,
    Rocky,
}

impl LayerId {
    pub const COUNT: usize = 10;

    pub const ALL: [LayerId; Self::COUNT] = [
        LayerId::BaseNoise,
        LayerId::Tectonics,
        LayerId::Elevation,
        LayerId::Moisture,
        LayerId::Temperature,
        LayerId::Biome,
        LayerId::Vegetation,
        LayerId::CloudDensity,
        LayerId::CloudFlow,
        LayerId::Rocky,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The camelCase name used by editing front ends.
    pub const fn name(self) -> &'static str {
        match self {
            LayerId::BaseNoise => "baseNoise",
            LayerId::Tectonics => "tectonics",
            LayerId::Elevation => "elevation",
            LayerId::Moisture => "moisture",
            LayerId::Temperature => "temperature",
            LayerId::Biome => "biome",
            LayerId::Vegetation => "vegetation",
            LayerId::CloudDensity => "cloudDensity",
            LayerId::CloudFlow => "cloudFlow",
            LayerId::Rocky => "rocky",
        }
    }

    pub fn from_name(name: &str) -> Option<LayerId> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value a layer produces at one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LayerValue {
    Scalar(f32),
    Biome(Biome),
    Flow(Vec3),
}

impl LayerValue {
    /// Numeric view: scalars as-is, biomes as their code, flows as `None`.
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            LayerValue::Scalar(v) => Some(*v),
            LayerValue::Biome(b) => Some(b.code() as f32),
            LayerValue::Flow(_) => None,
        }
    }
}

impl fmt::Display for LayerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerValue::Scalar(v) => write!(f, "{:.4}", v),
            LayerValue::Biome(b) => write!(f, "{} ({})", b.name(), b.code()),
            LayerValue::Flow(v) => write!(f, "({:.4}, {:.4}, {:.4})", v.x, v.y, v.z),
        }
    }
}

/// Values computed so far for one point, indexed by layer.
///
/// Disabled layers stay absent; readers treat them as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerSample {
    values: [Option<LayerValue>; LayerId::COUNT],
}

impl LayerSample {
    pub fn get(&self, id: LayerId) -> Option<LayerValue> {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: LayerId, value: LayerValue) {
        self.values[id.index()] = Some(value);
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.values[id.index()].is_some()
    }

    pub fn scalar(&self, id: LayerId) -> Option<f32> {
        self.get(id).and_then(|v| v.as_scalar())
    }

    /// Scalar value of `id`, or 0 when absent.
    pub fn scalar_or_zero(&self, id: LayerId) -> f32 {
        self.scalar(id).unwrap_or(0.0)
    }

    pub fn biome(&self) -> Option<Biome> {
        match self.get(LayerId::Biome) {
            Some(LayerValue::Biome(b)) => Some(b),
            _ => None,
        }
    }

    pub fn cloud_flow(&self) -> Option<Vec3> {
        match self.get(LayerId::CloudFlow) {
            Some(LayerValue::Flow(v)) => Some(v),
            _ => None,
        }
    }

    /// Present layers in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, LayerValue)> + '_ {
        LayerId::ALL
            .into_iter()
            .filter_map(|id| self.get(id).map(|v| (id, v)))
    }

    /// Final surface height: rocky if present, else elevation, else 0.
    pub fn height(&self) -> f32 {
        self.scalar(LayerId::Rocky)
            .or_else(|| self.scalar(LayerId::Elevation))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for id in LayerId::ALL {
            assert_eq!(LayerId::from_name(id.name()), Some(id));
        }
        assert_eq!(LayerId::from_name("cloudDensity"), Some(LayerId::CloudDensity));
        assert_eq!(LayerId::from_name("clouds"), None);
    }

    #[test]
    fn test_order_matches_index() {
        for (i, id) in LayerId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert!(LayerId::Elevation < LayerId::Temperature);
    }

    #[test]
    fn test_sample_height_fallbacks() {
        let mut sample = LayerSample::default();
        assert_eq!(sample.height(), 0.0);
        sample.set(LayerId::Elevation, LayerValue::Scalar(0.4));
        assert_eq!(sample.height(), 0.4);
        sample.set(LayerId::Rocky, LayerValue::Scalar(0.8));
        assert_eq!(sample.height(), 0.8);
    }

    #[test]
    fn test_flow_is_not_scalar() {
        let mut sample = LayerSample::default();
        sample.set(LayerId::CloudFlow, LayerValue::Flow(Vec3::X));
        assert_eq!(sample.scalar(LayerId::CloudFlow), None);
        assert_eq!(sample.cloud_flow(), Some(Vec3::X));
        assert_eq!(sample.iter().count(), 1);
    }
}
