//! Ordered modifier stacks.

use std::sync::Arc;

use glam::Vec3;

use super::modifier::{Modifier, SampleContext};
use crate::geometry::HeightFunction;
use crate::noise::{noise_seed, NoiseSource, SimplexNoise};

/// A seed plus an ordered list of modifiers folded into one height.
///
/// Evaluation is a pure function of the seed, the ordered modifier parameters
/// and the sample point, so the same stack can be read from many threads.
#[derive(Debug, Clone)]
pub struct ModifierStack {
    seed: u64,
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            modifiers: Vec::new(),
        }
    }

    /// The warped, terraced stack used for the classic planet look:
    /// domain warp, five FBM octaves, eight terraces and a soft plateau.
    pub fn terraced(seed: u64) -> Self {
        let noise: Arc<dyn NoiseSource> = Arc::new(SimplexNoise::new(noise_seed(seed)));
        let mut stack = Self::new(seed);
        stack
            .add(Modifier::domain_warp(noise.clone(), 0.2))
            .add(Modifier::fbm(noise, 1.0, 1.2, 5))
            .add(Modifier::terrace(8, 0.8))
            .add(Modifier::plateau(0.5, 0.3));
        stack
    }

    /// Appends a modifier to the end of the chain.
    pub fn add(&mut self, modifier: Modifier) -> &mut Self {
        self.modifiers.push(modifier);
        self
    }

    /// Builder-style [`ModifierStack::add`].
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Folds every modifier over a fresh context and clamps to [-1, 1].
    pub fn height(&self, p: Vec3) -> f32 {
        let mut ctx = SampleContext::new();
        let mut height = 0.0;
        for modifier in &self.modifiers {
            ctx.prev_height = height;
            height = modifier.apply(p, height, &mut ctx);
        }
        clamp_height(height)
    }

    pub fn height_at(&self, x: f32, y: f32, z: f32) -> f32 {
        self.height(Vec3::new(x, y, z))
    }
}

impl HeightFunction for ModifierStack {
    fn height(&self, p: Vec3) -> f32 {
        ModifierStack::height(self, p)
    }
}

/// Clamps to [-1, 1], collapsing NaN to 0.
pub fn clamp_height(h: f32) -> f32 {
    if h.is_nan() {
        0.0
    } else {
        h.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Octave;

    const COORDS: [[f32; 3]; 3] = [[0.1, 0.2, 0.3], [0.4, -0.2, -0.1], [0.8, 0.5, 0.9]];

    #[test]
    fn test_empty_stack_is_flat() {
        let stack = ModifierStack::new(1);
        assert!(stack.is_empty());
        assert_eq!(stack.height(Vec3::X), 0.0);
    }

    #[test]
    fn test_independent_stacks_are_bit_identical() {
        let a = ModifierStack::terraced(1234);
        let b = ModifierStack::terraced(1234);
        for [x, y, z] in COORDS {
            let ha = a.height_at(x, y, z);
            assert_eq!(ha.to_bits(), b.height_at(x, y, z).to_bits());
            assert_eq!(ha.to_bits(), a.height_at(x, y, z).to_bits());
        }
    }

    #[test]
    fn test_output_is_clamped() {
        let noise: Arc<dyn NoiseSource> = Arc::new(SimplexNoise::new(9));
        let stack = ModifierStack::new(9)
            .with(Modifier::fbm(noise, 50.0, 3.0, 6))
            .with(Modifier::cliff(0.0, 10.0));
        for i in 0..64 {
            let t = i as f32 * 0.37;
            let h = stack.height(Vec3::new(t.sin(), t.cos(), (t * 0.5).sin()));
            assert!((-1.0..=1.0).contains(&h), "height {} escaped the clamp", h);
        }
    }

    #[test]
    fn test_nan_collapses_to_zero() {
        assert_eq!(clamp_height(f32::NAN), 0.0);
        assert_eq!(clamp_height(f32::INFINITY), 1.0);
        assert_eq!(clamp_height(-3.0), -1.0);
    }

    #[test]
    fn test_context_prev_height_is_entering_height() {
        // A cliff directly after a constant offset sees zero slope.
        let noise: Arc<dyn NoiseSource> = Arc::new(crate::noise::CellularNoise::new(42));
        let stack = ModifierStack::new(42)
            .with(Modifier::worley(noise.clone(), vec![Octave::new(0.5, 1.0)]))
            .with(Modifier::cliff(0.0, 3.0));
        let bare = ModifierStack::new(42).with(Modifier::worley(noise, vec![Octave::new(0.5, 1.0)]));
        for [x, y, z] in COORDS {
            assert_eq!(stack.height_at(x, y, z), bare.height_at(x, y, z));
        }
    }

    #[test]
    fn test_order_matters() {
        let noise: Arc<dyn NoiseSource> = Arc::new(SimplexNoise::new(77));
        let warp_first = ModifierStack::new(77)
            .with(Modifier::domain_warp(noise.clone(), 0.5))
            .with(Modifier::fbm(noise.clone(), 1.0, 1.2, 5));
        let warp_last = ModifierStack::new(77)
            .with(Modifier::fbm(noise.clone(), 1.0, 1.2, 5))
            .with(Modifier::domain_warp(noise, 0.5));
        let differs = COORDS
            .iter()
            .any(|&[x, y, z]| warp_first.height_at(x, y, z) != warp_last.height_at(x, y, z));
        assert!(differs);
    }
}
