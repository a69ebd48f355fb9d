//! Cube-sphere geometry module.
//!
//! Maps the six cube faces onto the unit sphere with the area-balancing
//! correction and turns a height source into displaced, triangulated face
//! meshes.

mod builder;
mod cube_sphere;
mod face;
mod mesh;
mod source;

pub use builder::{FaceBuildTask, GeometryBuilder, GeometryError, MAX_RESOLUTION};
pub use cube_sphere::{cube_to_sphere, face_direction, face_uv_to_cube, grid_coord};
pub use face::CubeFaceId;
pub use mesh::{grid_indices, vertex_normals, FaceMesh};
pub use source::{FaceBufferSource, HeightFunction, HeightSource};
