//! The six face chunks of a planet and their shared height source.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::PlanetConfig;
use crate::geometry::{CubeFaceId, GeometryBuilder, HeightSource};
use crate::lod::{Camera, FaceChunk, LodController, RebuildError, RebuildMode};

/// A cube-sphere planet: one [`FaceChunk`] per cube face, a shared geometry
/// builder and the LOD policy.
#[derive(Debug)]
pub struct Planet {
    builder: Arc<GeometryBuilder>,
    lod: LodController,
    chunks: Vec<FaceChunk>,
}

impl Planet {
    pub fn new(builder: GeometryBuilder, lod: LodController, base_resolution: u32, mode: RebuildMode) -> Self {
        let chunks = CubeFaceId::all()
            .into_iter()
            .map(|face| FaceChunk::new(face, base_resolution, builder.radius(), mode))
            .collect();
        Self {
            builder: Arc::new(builder),
            lod,
            chunks,
        }
    }

    pub fn from_config(config: &PlanetConfig) -> Self {
        let builder = GeometryBuilder::new(config.height_source(), config.radius);
        info!(
            seed = config.seed,
            model = ?config.height_model,
            base_resolution = config.base_resolution,
            "creating planet"
        );
        Self::new(builder, config.lod(), config.base_resolution, config.rebuild_mode)
    }

    pub fn builder(&self) -> &Arc<GeometryBuilder> {
        &self.builder
    }

    pub fn lod(&self) -> &LodController {
        &self.lod
    }

    pub fn chunks(&self) -> &[FaceChunk] {
        &self.chunks
    }

    pub fn chunk(&self, face: CubeFaceId) -> &FaceChunk {
        &self.chunks[face.index()]
    }

    pub fn chunk_mut(&mut self, face: CubeFaceId) -> &mut FaceChunk {
        &mut self.chunks[face.index()]
    }

    /// Updates every chunk against one frustum built from `camera`.
    pub fn update(&mut self, camera: &Camera) {
        let frustum = camera.frustum();
        for chunk in &mut self.chunks {
            chunk.update(camera, &self.lod, &frustum, &self.builder);
        }
    }

    /// Rebuilds all six faces at their current resolution, in parallel, and
    /// waits for them.
    pub fn rebuild_all(&mut self) -> Result<(), RebuildError> {
        // Finish pooled work first so no rayon worker blocks on a job queued
        // behind it.
        for chunk in &mut self.chunks {
            if let Err(err) = chunk.wait() {
                warn!(face = %chunk.face(), %err, "previous rebuild failed");
            }
        }

        let builder = &self.builder;
        self.chunks
            .par_iter_mut()
            .try_for_each(|chunk| chunk.rebuild_now(builder))?;
        debug!("rebuild wave finished");
        Ok(())
    }

    /// Blocks until every running rebuild has finished.
    pub fn wait_all(&mut self) -> Result<(), RebuildError> {
        for chunk in &mut self.chunks {
            chunk.wait()?;
        }
        Ok(())
    }

    /// Replaces the height source and marks every chunk stale.
    ///
    /// Rebuilds already running keep the previous source and complete
    /// normally; the chunks rebuild again on their next update.
    pub fn set_height_source(&mut self, source: HeightSource) {
        debug!(source = source.kind(), "height source replaced");
        self.builder = Arc::new(self.builder.with_source(source));
        for chunk in &mut self.chunks {
            chunk.invalidate();
        }
    }

    pub fn is_rebuilding(&self) -> bool {
        self.chunks.iter().any(FaceChunk::is_rebuilding)
    }

    pub fn visible_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_visible()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeightModel;
    use crate::terrain::ModifierStack;
    use glam::Vec3;

    fn camera_at(eye: Vec3) -> Camera {
        Camera::perspective(eye, Vec3::ZERO, 1.0, 1.0, 0.1, 1000.0)
    }

    fn small_config(model: HeightModel, mode: RebuildMode) -> PlanetConfig {
        PlanetConfig {
            base_resolution: 4,
            height_model: model,
            rebuild_mode: mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_chunks_cover_all_faces() {
        let planet = Planet::from_config(&small_config(HeightModel::Flat, RebuildMode::Inline));
        assert_eq!(planet.chunks().len(), 6);
        for face in CubeFaceId::all() {
            assert_eq!(planet.chunk(face).face(), face);
        }
    }

    #[test]
    fn test_rebuild_wave_builds_every_face() {
        let mut planet = Planet::from_config(&small_config(HeightModel::Flat, RebuildMode::Pooled));
        planet.rebuild_all().unwrap();
        assert!(!planet.is_rebuilding());
        for chunk in planet.chunks() {
            let mesh = chunk.mesh().unwrap();
            assert_eq!(mesh.resolution, 4);
            for p in mesh.positions_iter() {
                assert!((p.length() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_far_camera_uses_coarsest_level() {
        let mut planet = Planet::from_config(&small_config(HeightModel::Flat, RebuildMode::Inline));
        planet.update(&camera_at(Vec3::new(0.0, 0.0, 200.0)));
        assert!(!planet.is_rebuilding());
        assert!(planet.visible_count() >= 1);
        assert!(planet.chunk(CubeFaceId::PosZ).is_visible());
        for chunk in planet.chunks() {
            assert_eq!(chunk.level(), 0);
        }
    }

    #[test]
    fn test_height_source_swap_triggers_rebuild() {
        let mut planet = Planet::from_config(&small_config(HeightModel::Flat, RebuildMode::Inline));
        let camera = camera_at(Vec3::new(0.0, 0.0, 200.0));
        planet.update(&camera);
        let flat = planet.chunk(CubeFaceId::PosX).mesh().cloned().unwrap();

        planet.set_height_source(HeightSource::function(ModifierStack::terraced(1234)));
        assert!(planet.chunks().iter().all(|c| c.is_stale()));
        planet.update(&camera);

        let shaped = planet.chunk(CubeFaceId::PosX).mesh().cloned().unwrap();
        assert_ne!(flat.positions, shaped.positions);
        assert_eq!(planet.builder().source().kind(), "function");
    }

    #[test]
    fn test_pooled_updates_converge_to_inline_meshes() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 200.0));
        let mut inline = Planet::from_config(&small_config(HeightModel::TerracedStack, RebuildMode::Inline));
        inline.update(&camera);

        let mut pooled = Planet::from_config(&small_config(HeightModel::TerracedStack, RebuildMode::Pooled));
        pooled.update(&camera);
        pooled.wait_all().unwrap();

        for face in CubeFaceId::all() {
            assert_eq!(inline.chunk(face).mesh(), pooled.chunk(face).mesh());
        }
    }
}
