//! Synthetic plate tectonics.
//!
//! A [`PlateField`] scatters seeded plates over the unit sphere, each with a
//! tangent drift direction. Points close to the bisector between their two
//! nearest plates are classified as divergent, convergent or transform
//! boundaries, and [`PlateModifier`] turns that classification into rifts,
//! ridges and volcanic roughness.

mod boundary;
mod config;
mod field;
mod modifier;
mod plate;

pub use boundary::{classify_boundary, classify_motion, BoundaryInfo, BoundaryKind, DIVERGENCE_THRESHOLD};
pub use config::TectonicConfig;
pub use field::{PlateField, PlateHit};
pub use modifier::PlateModifier;
pub use plate::{sphere_point, tangent_drift, Plate, PlateKind};
