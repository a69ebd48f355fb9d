//! Multi-octave fractal noise and the batch face-buffer backend.
//!
//! [`BatchHeightGenerator`] produces whole face grids at once, one batch of
//! positions per grid row, and plugs into the geometry builder through
//! [`FaceBufferSource`] the way an accelerated backend would.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

use crate::geometry::{face_direction, grid_coord, CubeFaceId, FaceBufferSource};

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves.
    pub octaves: u8,
    /// Base frequency of the noise.
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (typically 0.5).
    pub persistence: f32,
    /// Output scale applied after normalization.
    pub amplitude: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 5,
            frequency: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            amplitude: 1.0,
            seed: 1234,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

/// Samples one octave of simplex noise at `p`.
fn octave_sample(p: Vec3, seed: i32) -> f32 {
    NoiseBuilder::fbm_4d_offset(p.x, 1, p.y, 1, p.z, 1, 0.0, 1)
        .with_seed(seed)
        .with_freq(1.0)
        .with_octaves(1)
        .generate()
        .0[0]
}

/// Samples fractal noise at a 3D position, normalized by the amplitude sum
/// and scaled by `config.amplitude`.
pub fn sample_fractal_noise(pos: Vec3, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        let octave_seed = config.seed.wrapping_add(octave as i32 * 31337);
        total += octave_sample(pos * frequency, octave_seed) * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude <= 0.0 {
        return 0.0;
    }
    total / max_amplitude * config.amplitude
}

/// Samples fractal noise for a batch of positions, octave by octave.
///
/// Each result equals [`sample_fractal_noise`] at the same position.
pub fn sample_fractal_noise_batch(positions: &[Vec3], config: &FractalNoiseConfig) -> Vec<f32> {
    let mut results = vec![0.0f32; positions.len()];
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        let octave_seed = config.seed.wrapping_add(octave as i32 * 31337);
        for (result, &pos) in results.iter_mut().zip(positions) {
            *result += octave_sample(pos * frequency, octave_seed) * amplitude;
        }
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude <= 0.0 {
        results.fill(0.0);
        return results;
    }
    for result in &mut results {
        *result = *result / max_amplitude * config.amplitude;
    }
    results
}

/// Face-buffer height backend evaluating fractal noise over whole grids.
#[derive(Debug, Clone)]
pub struct BatchHeightGenerator {
    config: FractalNoiseConfig,
}

impl BatchHeightGenerator {
    pub fn new(config: FractalNoiseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }
}

impl FaceBufferSource for BatchHeightGenerator {
    fn generate(&self, face: CubeFaceId, size: u32) -> Vec<f32> {
        if size < 2 {
            return vec![0.0; (size * size) as usize];
        }
        let resolution = size - 1;

        // One batch per grid row; rows are independent.
        let mut out = vec![0.0f32; (size as usize) * (size as usize)];
        out.par_chunks_mut(size as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let v = grid_coord(y as u32, resolution);
                let positions: Vec<Vec3> = (0..size)
                    .map(|x| face_direction(face, grid_coord(x, resolution), v))
                    .collect();
                let heights = sample_fractal_noise_batch(&positions, &self.config);
                for (h, sample) in row.iter_mut().zip(heights) {
                    *h = sample.clamp(-1.0, 1.0);
                }
            });
        out
    }
}
