//! Seeded noise primitives.
//!
//! Every noise-backed component receives its source explicitly through
//! [`NoiseSource`], so a stack or pipeline never builds hidden generators and
//! two instances built from the same seed sample identical values.
//!
//! Point sampling uses fastnoise-lite (OpenSimplex2 and cellular). The batch
//! face backend in [`fractal`] uses simdnoise.

pub mod fractal;

use std::fmt;

use fastnoise_lite::{CellularReturnType, FastNoiseLite, NoiseType};
use glam::Vec3;

pub use fractal::{sample_fractal_noise, sample_fractal_noise_batch, BatchHeightGenerator, FractalNoiseConfig};

/// A deterministic 3D scalar noise function.
///
/// Implementations must be pure: the value depends only on the seed the
/// source was built with and the sample position.
pub trait NoiseSource: Send + Sync + fmt::Debug {
    /// Samples the noise at `p`, roughly in [-1, 1].
    fn sample(&self, p: Vec3) -> f32;
}

/// OpenSimplex2 gradient noise.
pub struct SimplexNoise {
    seed: i32,
    inner: FastNoiseLite,
}

impl SimplexNoise {
    /// Creates a simplex source with unit frequency, so callers control
    /// feature size by scaling coordinates.
    pub fn new(seed: i32) -> Self {
        let mut inner = FastNoiseLite::with_seed(seed);
        inner.set_noise_type(Some(NoiseType::OpenSimplex2));
        inner.set_frequency(Some(1.0));
        Self { seed, inner }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimplexNoise").field("seed", &self.seed).finish()
    }
}

impl NoiseSource for SimplexNoise {
    fn sample(&self, p: Vec3) -> f32 {
        self.inner.get_noise_3d(p.x, p.y, p.z)
    }
}

/// Cellular (Worley) noise returning the per-cell value.
pub struct CellularNoise {
    seed: i32,
    inner: FastNoiseLite,
}

impl CellularNoise {
    pub fn new(seed: i32) -> Self {
        let mut inner = FastNoiseLite::with_seed(seed);
        inner.set_noise_type(Some(NoiseType::Cellular));
        inner.set_cellular_return_type(Some(CellularReturnType::CellValue));
        inner.set_frequency(Some(1.0));
        Self { seed, inner }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl fmt::Debug for CellularNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellularNoise").field("seed", &self.seed).finish()
    }
}

impl NoiseSource for CellularNoise {
    fn sample(&self, p: Vec3) -> f32 {
        self.inner.get_noise_3d(p.x, p.y, p.z)
    }
}

/// Folds a 64-bit seed into the 32-bit seed the noise generators take.
pub fn noise_seed(seed: u64) -> i32 {
    (seed ^ (seed >> 32)) as u32 as i32
}
