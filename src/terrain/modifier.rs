//! Elevation modifiers and the per-sample scratch context.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseSource;
use crate::tectonics::PlateModifier;

/// One explicit noise octave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    pub amplitude: f32,
    pub frequency: f32,
}

impl Octave {
    pub const fn new(amplitude: f32, frequency: f32) -> Self {
        Self { amplitude, frequency }
    }
}

/// How an FBM modifier walks its octaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OctaveSeries {
    /// Frequency doubles and amplitude halves at each step.
    Geometric { octaves: u32 },
    /// Per-octave amplitude and frequency given explicitly.
    Explicit(Vec<Octave>),
}

/// Scratch state threaded through one modifier chain evaluation.
///
/// A context lives on the evaluating thread's stack for exactly one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleContext {
    /// Height entering the modifier currently being applied.
    pub prev_height: f32,
    /// Coordinate written by a preceding domain warp.
    pub warped: Option<Vec3>,
}

impl SampleContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coordinate noise should be sampled at: the warped one if present.
    pub fn sample_point(&self, p: Vec3) -> Vec3 {
        self.warped.unwrap_or(p)
    }
}

/// A single elevation transform `(point, height, context) -> height`.
#[derive(Debug, Clone)]
pub enum Modifier {
    /// Adds fractal noise sampled at the (possibly warped) coordinate.
    Fbm {
        noise: Arc<dyn NoiseSource>,
        amplitude: f32,
        frequency: f32,
        series: OctaveSeries,
    },
    /// Offsets the sampling coordinate for every later modifier.
    DomainWarp {
        noise: Arc<dyn NoiseSource>,
        intensity: f32,
    },
    /// Quantizes height into evenly spaced steps.
    Terrace { steps: u32, height_range: f32 },
    /// Amplifies height where the local slope estimate is steep.
    Cliff { threshold: f32, boost: f32 },
    /// Compresses height above a threshold.
    Plateau { threshold: f32, factor: f32 },
    /// Adds a weighted sum of cellular noise samples.
    Worley {
        noise: Arc<dyn NoiseSource>,
        octaves: Vec<Octave>,
    },
    /// Plate boundary uplift and rifting.
    Plates(PlateModifier),
}

impl Modifier {
    pub fn fbm(noise: Arc<dyn NoiseSource>, amplitude: f32, frequency: f32, octaves: u32) -> Self {
        Modifier::Fbm {
            noise,
            amplitude,
            frequency,
            series: OctaveSeries::Geometric { octaves },
        }
    }

    pub fn fbm_explicit(noise: Arc<dyn NoiseSource>, octaves: Vec<Octave>) -> Self {
        Modifier::Fbm {
            noise,
            amplitude: 1.0,
            frequency: 1.0,
            series: OctaveSeries::Explicit(octaves),
        }
    }

    pub fn domain_warp(noise: Arc<dyn NoiseSource>, intensity: f32) -> Self {
        Modifier::DomainWarp { noise, intensity }
    }

    pub fn terrace(steps: u32, height_range: f32) -> Self {
        Modifier::Terrace { steps, height_range }
    }

    pub fn cliff(threshold: f32, boost: f32) -> Self {
        Modifier::Cliff { threshold, boost }
    }

    pub fn plateau(threshold: f32, factor: f32) -> Self {
        Modifier::Plateau { threshold, factor }
    }

    pub fn worley(noise: Arc<dyn NoiseSource>, octaves: Vec<Octave>) -> Self {
        Modifier::Worley { noise, octaves }
    }

    /// Short name used in logs and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Fbm { .. } => "fbm",
            Modifier::DomainWarp { .. } => "domain-warp",
            Modifier::Terrace { .. } => "terrace",
            Modifier::Cliff { .. } => "cliff",
            Modifier::Plateau { .. } => "plateau",
            Modifier::Worley { .. } => "worley",
            Modifier::Plates(_) => "plates",
        }
    }

    /// Applies this modifier to `height` at point `p`.
    ///
    /// Only [`Modifier::DomainWarp`] writes to the context.
    pub fn apply(&self, p: Vec3, height: f32, ctx: &mut SampleContext) -> f32 {
        match self {
            Modifier::Fbm {
                noise,
                amplitude,
                frequency,
                series,
            } => {
                let s = ctx.sample_point(p);
                height + fbm(noise.as_ref(), s, *amplitude, *frequency, series)
            }
            Modifier::DomainWarp { noise, intensity } => {
                let warp = noise.sample(p) * intensity;
                ctx.warped = Some(p + Vec3::splat(warp));
                height
            }
            Modifier::Terrace { steps, height_range } => terrace(height, *steps, *height_range),
            Modifier::Cliff { threshold, boost } => {
                let slope = (ctx.prev_height - height).abs();
                if slope > *threshold {
                    height * boost
                } else {
                    height
                }
            }
            Modifier::Plateau { threshold, factor } => {
                if height > *threshold {
                    threshold + (height - threshold) * factor
                } else {
                    height
                }
            }
            Modifier::Worley { noise, octaves } => {
                let sum: f32 = octaves
                    .iter()
                    .map(|o| noise.sample(p * o.frequency) * o.amplitude)
                    .sum();
                height + sum
            }
            Modifier::Plates(plates) => plates.apply(p, height),
        }
    }
}

fn fbm(noise: &dyn NoiseSource, s: Vec3, amplitude: f32, frequency: f32, series: &OctaveSeries) -> f32 {
    match series {
        OctaveSeries::Geometric { octaves } => {
            let mut value = 0.0;
            let mut amp = amplitude;
            let mut freq = frequency;
            for _ in 0..*octaves {
                value += noise.sample(s * freq) * amp;
                freq *= 2.0;
                amp *= 0.5;
            }
            value
        }
        OctaveSeries::Explicit(octaves) => octaves
            .iter()
            .map(|o| noise.sample(s * o.frequency) * o.amplitude)
            .sum(),
    }
}

/// Maps [-1, 1] onto `steps` evenly spaced levels spanning
/// `[-height_range, height_range]`.
fn terrace(height: f32, steps: u32, height_range: f32) -> f32 {
    if steps < 2 {
        return 0.0;
    }
    let t = ((height + 1.0) * 0.5).clamp(0.0, 1.0);
    let last = (steps - 1) as f32;
    let level = (t * steps as f32).floor().min(last);
    (level / last * 2.0 - 1.0) * height_range
}
