//! Tectonic plate data structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Type of crust a plate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateKind {
    Oceanic,
    Continental,
}

impl PlateKind {
    pub fn name(self) -> &'static str {
        match self {
            PlateKind::Oceanic => "oceanic",
            PlateKind::Continental => "continental",
        }
    }
}

/// A rigid plate on the unit sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    /// Index of this plate in its field.
    pub id: usize,
    /// Center point of the plate on the unit sphere.
    pub center: Vec3,
    /// Unit drift direction, tangent to the sphere at `center`.
    pub drift: Vec3,
    pub kind: PlateKind,
}

impl Plate {
    pub fn new(id: usize, center: Vec3, drift: Vec3, kind: PlateKind) -> Self {
        Self {
            id,
            center,
            drift,
            kind,
        }
    }

    pub fn is_continental(&self) -> bool {
        self.kind == PlateKind::Continental
    }
}

/// Point on the unit sphere from two uniform draws in [0, 1).
pub fn sphere_point(r_height: f32, r_angle: f32) -> Vec3 {
    let u = r_height * 2.0 - 1.0;
    let theta = r_angle * std::f32::consts::TAU;
    let s = (1.0 - u * u).max(0.0).sqrt();
    Vec3::new(s * theta.cos(), s * theta.sin(), u)
}

/// Projects `raw` onto the tangent plane at `center` and normalizes it.
///
/// Degenerate inputs (zero, or parallel to `center`) fall back to an
/// arbitrary unit vector orthogonal to `center`.
pub fn tangent_drift(center: Vec3, raw: Vec3) -> Vec3 {
    raw.try_normalize()
        .and_then(|r| (r - center * center.dot(r)).try_normalize())
        .unwrap_or_else(|| center.any_orthonormal_vector())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_point_is_unit() {
        for (a, b) in [(0.0, 0.0), (0.25, 0.5), (0.999, 0.1), (0.5, 0.999)] {
            assert!((sphere_point(a, b).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_point_poles() {
        let south = sphere_point(0.0, 0.3);
        assert!((south.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tangent_drift_is_orthogonal() {
        let center = Vec3::new(0.3, 0.4, 0.866).normalize();
        let drift = tangent_drift(center, Vec3::new(0.9, 0.1, 0.5));
        assert!(drift.dot(center).abs() < 1e-5);
        assert!((drift.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tangent_drift_degenerate_fallback() {
        let center = Vec3::Z;
        for raw in [Vec3::ZERO, Vec3::Z * 0.5] {
            let drift = tangent_drift(center, raw);
            assert!(drift.dot(center).abs() < 1e-5);
            assert!((drift.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(PlateKind::Oceanic.name(), "oceanic");
        let plate = Plate::new(0, Vec3::X, Vec3::Y, PlateKind::Continental);
        assert!(plate.is_continental());
    }
}
