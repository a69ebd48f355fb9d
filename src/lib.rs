//! Deterministic cube-sphere planet generator.
//!
//! Heights come from an ordered noise modifier stack, a named layer pipeline
//! (base noise, synthetic plate tectonics, climate signals) or a batch face
//! backend. The geometry builder turns them into displaced meshes for the six
//! cube faces, and each face chunk picks its detail level from the camera
//! distance and rebuilds incrementally as parameters change.

pub mod config;
pub mod geometry;
pub mod layers;
pub mod lod;
pub mod noise;
pub mod planet;
pub mod tectonics;
pub mod terrain;

pub use config::{ConfigError, HeightModel, PlanetConfig};
pub use geometry::{CubeFaceId, FaceMesh, GeometryBuilder, GeometryError, HeightSource};
pub use layers::{Biome, LayerId, LayerPipeline, LayerSample, LayerValue};
pub use lod::{Camera, FaceChunk, LodController, RebuildError, RebuildMode};
pub use noise::FractalNoiseConfig;
pub use planet::Planet;
pub use tectonics::{PlateField, PlateModifier, TectonicConfig};
pub use terrain::{Modifier, ModifierStack};
