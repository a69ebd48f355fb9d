//! Cube face grid to sphere direction mapping.

use glam::Vec3;
use super::face::CubeFaceId;

/// Maps face-local coordinates `u, v` in [-1, 1] to a point on the unit cube.
///
/// One axis is pinned to ±1 and the other two are driven by `u` and `v` with
/// a face-dependent permutation. All six faces share the same handedness, so a
/// grid walked in +u then +v order produces outward-facing triangles.
pub fn face_uv_to_cube(face: CubeFaceId, u: f32, v: f32) -> Vec3 {
    match face {
        CubeFaceId::PosX => Vec3::new(1.0, v, -u),
        CubeFaceId::NegX => Vec3::new(-1.0, v, u),
        CubeFaceId::PosY => Vec3::new(u, 1.0, -v),
        CubeFaceId::NegY => Vec3::new(u, -1.0, v),
        CubeFaceId::PosZ => Vec3::new(u, v, 1.0),
        CubeFaceId::NegZ => Vec3::new(-u, v, -1.0),
    }
}

/// Projects a point on the unit cube onto the unit sphere.
///
/// Uses the analytic mapping `x' = x * sqrt(1 - (y² + z²)/2 + y²z²/3)`,
/// cyclic in the other two axes.
pub fn cube_to_sphere(p: Vec3) -> Vec3 {
    let x2 = p.x * p.x;
    let y2 = p.y * p.y;
    let z2 = p.z * p.z;

    Vec3::new(
        p.x * (1.0 - (y2 + z2) / 2.0 + y2 * z2 / 3.0).max(0.0).sqrt(),
        p.y * (1.0 - (z2 + x2) / 2.0 + z2 * x2 / 3.0).max(0.0).sqrt(),
        p.z * (1.0 - (x2 + y2) / 2.0 + x2 * y2 / 3.0).max(0.0).sqrt(),
    )
}

/// Unit sphere direction for a face-local coordinate.
pub fn face_direction(face: CubeFaceId, u: f32, v: f32) -> Vec3 {
    cube_to_sphere(face_uv_to_cube(face, u, v))
}

/// Maps grid index `i` of a `(resolution + 1)`-wide grid to [-1, 1].
#[inline]
pub fn grid_coord(i: u32, resolution: u32) -> f32 {
    (i as f32 / resolution as f32) * 2.0 - 1.0
}
