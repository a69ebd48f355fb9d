//! Seeded plate field with nearest-plate queries.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::boundary::{classify_boundary, BoundaryInfo};
use super::config::TectonicConfig;
use super::plate::{sphere_point, tangent_drift, Plate, PlateKind};

/// A plate and its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateHit {
    pub index: usize,
    pub distance: f32,
}

/// A fixed set of plates generated from a seed.
///
/// Plates never change after construction; share the field behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PlateField {
    seed: u64,
    boundary_radius: f32,
    plates: Vec<Plate>,
}

impl PlateField {
    /// Generates `plate_count` plates.
    ///
    /// Draws happen in a fixed order per plate (center, drift, kind) so the
    /// same arguments always produce the same field.
    pub fn new(seed: u64, plate_count: usize, boundary_radius: f32, continental_fraction: f32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut plates = Vec::with_capacity(plate_count);

        for id in 0..plate_count {
            let center = sphere_point(rng.random::<f32>(), rng.random::<f32>());
            let raw = Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>());
            let drift = tangent_drift(center, raw);
            let kind = if rng.random::<f32>() < continental_fraction {
                PlateKind::Continental
            } else {
                PlateKind::Oceanic
            };
            plates.push(Plate::new(id, center, drift, kind));
        }

        debug!(seed, plate_count, boundary_radius, "generated plate field");

        Self {
            seed,
            boundary_radius,
            plates,
        }
    }

    /// Wraps an explicit plate layout.
    pub fn from_plates(seed: u64, boundary_radius: f32, plates: Vec<Plate>) -> Self {
        Self {
            seed,
            boundary_radius,
            plates,
        }
    }

    pub fn from_config(seed: u64, config: &TectonicConfig) -> Self {
        Self::new(
            seed,
            config.plate_count,
            config.boundary_radius,
            config.continental_fraction,
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn boundary_radius(&self) -> f32 {
        self.boundary_radius
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    pub fn continental_count(&self) -> usize {
        self.plates.iter().filter(|p| p.is_continental()).count()
    }

    /// The two plates whose centers are closest to `point`, nearest first.
    ///
    /// Linear in the plate count. On equal distances the plate found first
    /// keeps its rank. Returns `None` with fewer than two plates.
    pub fn nearest_two(&self, point: Vec3) -> Option<(PlateHit, PlateHit)> {
        let mut first: Option<PlateHit> = None;
        let mut second: Option<PlateHit> = None;

        for (index, plate) in self.plates.iter().enumerate() {
            let hit = PlateHit {
                index,
                distance: point.distance(plate.center),
            };
            match first {
                Some(f) if hit.distance >= f.distance => {
                    if second.map_or(true, |s| hit.distance < s.distance) {
                        second = Some(hit);
                    }
                }
                _ => {
                    second = first;
                    first = Some(hit);
                }
            }
        }

        first.zip(second)
    }

    /// Plate owning `point` (the nearest center).
    pub fn plate_at(&self, point: Vec3) -> Option<&Plate> {
        let n = point.try_normalize()?;
        self.plates
            .iter()
            .map(|p| (p, n.distance(p.center)))
            .fold(None, |best: Option<(&Plate, f32)>, (p, d)| match best {
                Some((_, bd)) if d >= bd => best,
                _ => Some((p, d)),
            })
            .map(|(p, _)| p)
    }

    /// Boundary information at `point` when it lies within `radius` of the
    /// boundary between its two nearest plates.
    pub fn boundary_info(&self, point: Vec3, radius: f32) -> Option<BoundaryInfo> {
        let n = point.try_normalize()?;
        let (first, second) = self.nearest_two(n)?;
        let gap = second.distance - first.distance;
        if gap > radius {
            return None;
        }

        let kind = classify_boundary(&self.plates[first.index], &self.plates[second.index]);
        Some(BoundaryInfo {
            kind,
            distance: gap,
            first: first.index,
            second: second.index,
        })
    }

    /// [`PlateField::boundary_info`] with this field's own boundary radius.
    pub fn boundary(&self, point: Vec3) -> Option<BoundaryInfo> {
        self.boundary_info(point, self.boundary_radius)
    }
}
