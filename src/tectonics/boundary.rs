//! Plate boundary classification.

use serde::{Deserialize, Serialize};

use super::plate::Plate;

/// Relative motion above which plates count as separating, and below the
/// negation of which they count as colliding.
pub const DIVERGENCE_THRESHOLD: f32 = 0.3;

/// Type of plate boundary based on relative motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// Plates moving apart (rifts, ridges).
    Divergent,
    /// Plates moving toward each other (mountains, volcanic arcs).
    Convergent,
    /// Plates sliding past each other.
    Transform,
}

impl BoundaryKind {
    pub fn name(self) -> &'static str {
        match self {
            BoundaryKind::Divergent => "divergent",
            BoundaryKind::Convergent => "convergent",
            BoundaryKind::Transform => "transform",
        }
    }
}

/// A point's position relative to the nearest plate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    pub kind: BoundaryKind,
    /// Gap between the distances to the two nearest plate centers.
    pub distance: f32,
    /// Index of the nearest plate.
    pub first: usize,
    /// Index of the second nearest plate.
    pub second: usize,
}

/// Classifies the boundary between `first` and `second` from the drift of
/// `second` relative to `first`, projected on the line joining their centers.
pub fn classify_boundary(first: &Plate, second: &Plate) -> BoundaryKind {
    let relative = second.drift - first.drift;
    let normal = (second.center - first.center).normalize_or_zero();
    classify_motion(relative.dot(normal))
}

/// Maps a separation rate to a boundary kind.
pub fn classify_motion(separation: f32) -> BoundaryKind {
    if separation > DIVERGENCE_THRESHOLD {
        BoundaryKind::Divergent
    } else if separation < -DIVERGENCE_THRESHOLD {
        BoundaryKind::Convergent
    } else {
        BoundaryKind::Transform
    }
}
