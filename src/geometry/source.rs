//! Height sources consumed by the geometry builder.
//!
//! A builder does not care how heights are produced: a per-vertex function
//! (layer pipeline, modifier stack) and a precomputed per-face buffer (batch or
//! accelerated backend) are interchangeable strategies of [`HeightSource`].

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use super::face::CubeFaceId;

/// A pure height function over sphere directions.
pub trait HeightFunction: Send + Sync {
    /// Height at unit direction `p`, expected in [-1, 1].
    fn height(&self, p: Vec3) -> f32;

    /// Convenience form taking separate coordinates.
    fn height_at(&self, x: f32, y: f32, z: f32) -> f32 {
        self.height(Vec3::new(x, y, z))
    }
}

/// A backend that produces whole face grids at once.
pub trait FaceBufferSource: Send + Sync {
    /// Returns a row-major `size * size` height buffer for `face`, where
    /// `size` is the number of grid vertices along one edge.
    fn generate(&self, face: CubeFaceId, size: u32) -> Vec<f32>;
}

/// The active height strategy of a geometry builder.
#[derive(Clone, Default)]
pub enum HeightSource {
    /// No source: every vertex sits at height 0 (a perfect sphere).
    #[default]
    Flat,
    /// Evaluated per vertex at the corrected sphere direction.
    Function(Arc<dyn HeightFunction>),
    /// Precomputed buffer indexed by grid coordinates.
    FaceBuffers(Arc<dyn FaceBufferSource>),
}

impl HeightSource {
    pub fn function<F: HeightFunction + 'static>(f: F) -> Self {
        HeightSource::Function(Arc::new(f))
    }

    pub fn face_buffers<B: FaceBufferSource + 'static>(b: B) -> Self {
        HeightSource::FaceBuffers(Arc::new(b))
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HeightSource::Flat => "flat",
            HeightSource::Function(_) => "function",
            HeightSource::FaceBuffers(_) => "face-buffers",
        }
    }
}

impl fmt::Debug for HeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeightSource::{}", self.kind())
    }
}

impl<F> HeightFunction for F
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    fn height(&self, p: Vec3) -> f32 {
        self(p)
    }
}
