//! View frustum culling.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// What the LOD system needs from a camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub view_projection: Mat4,
}

impl Camera {
    pub fn new(position: Vec3, view_projection: Mat4) -> Self {
        Self {
            position,
            view_projection,
        }
    }

    /// Right-handed perspective camera at `eye` looking at `target`.
    pub fn perspective(eye: Vec3, target: Vec3, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh(fov_y, aspect, near, far);
        Self::new(eye, projection * view)
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.view_projection)
    }
}

/// Six inward-facing planes `(n, d)` with `n · p + d >= 0` inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extracts planes from a view-projection matrix with a [0, 1] depth
    /// range.
    pub fn from_view_projection(m: Mat4) -> Self {
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(normalize_plane);
        Self { planes }
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.intersects_sphere(p, 0.0)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(center) + plane.w >= -radius)
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let len = plane.truncate().length();
    if len > 0.0 {
        plane / len
    } else {
        plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 60f32.to_radians(), 1.0, 0.1, 1000.0)
    }

    #[test]
    fn test_sphere_in_front_is_visible() {
        assert!(camera().frustum().intersects_sphere(Vec3::ZERO, 1.0));
    }

    #[test]
    fn test_sphere_behind_is_culled() {
        assert!(!camera().frustum().intersects_sphere(Vec3::new(0.0, 0.0, 10.0), 1.0));
    }

    #[test]
    fn test_side_culling_respects_radius() {
        let frustum = camera().frustum();
        let side = Vec3::new(20.0, 0.0, 0.0);
        assert!(!frustum.intersects_sphere(side, 1.0));
        assert!(frustum.intersects_sphere(side, 20.0));
    }

    #[test]
    fn test_far_plane() {
        let frustum = camera().frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -900.0)));
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -1100.0)));
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in camera().frustum().planes() {
            assert!((plane.truncate().length() - 1.0).abs() < 1e-4);
        }
    }
}
