//! Triangle mesh output for one cube face.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::face::CubeFaceId;

/// A triangulated face grid with flat vertex buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMesh {
    pub face: CubeFaceId,
    /// Cells along one face edge; the grid has `resolution + 1` vertices per edge.
    pub resolution: u32,
    /// xyz triples.
    pub positions: Vec<f32>,
    pub indices: Vec<u32>,
    /// Unit xyz triples, one per vertex.
    pub normals: Vec<f32>,
}

impl FaceMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[i * 3..i * 3 + 3])
    }

    pub fn positions_iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Largest distance from `center` to any vertex.
    pub fn bounding_radius(&self, center: Vec3) -> f32 {
        self.positions_iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max)
    }

    /// Minimum and maximum vertex distance from the planet center.
    pub fn radius_range(&self) -> (f32, f32) {
        self.positions_iter()
            .map(Vec3::length)
            .fold((f32::MAX, f32::MIN), |(lo, hi), r| (lo.min(r), hi.max(r)))
    }
}

/// Two triangles per grid cell with a fixed diagonal.
///
/// With `a = (x, y)`, `b = (x+1, y)`, `c = (x, y+1)`, `d = (x+1, y+1)` the
/// cell emits `(a, b, c)` and `(b, d, c)`, which winds outward on every face
/// of the cube mapping.
pub fn grid_indices(resolution: u32) -> Vec<u32> {
    let size = resolution + 1;
    let mut indices = Vec::with_capacity((resolution * resolution * 6) as usize);
    for y in 0..resolution {
        for x in 0..resolution {
            let a = y * size + x;
            let b = a + 1;
            let c = a + size;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    indices
}

/// Area-weighted vertex normals.
///
/// Each triangle contributes its unnormalized face normal, whose length is
/// proportional to its area. Vertices with no usable contribution fall back
/// to their radial direction.
pub fn vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex = |i: u32| Vec3::from_slice(&positions[i as usize * 3..i as usize * 3 + 3]);
    let mut acc = vec![Vec3::ZERO; positions.len() / 3];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        let n = (b - a).cross(c - a);
        for &i in tri {
            acc[i as usize] += n;
        }
    }

    let mut normals = Vec::with_capacity(positions.len());
    for (i, n) in acc.iter().enumerate() {
        let n = n.try_normalize().unwrap_or_else(|| vertex(i as u32).normalize_or_zero());
        normals.extend_from_slice(&[n.x, n.y, n.z]);
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_indices_count() {
        let indices = grid_indices(4);
        assert_eq!(indices.len(), 4 * 4 * 6);
        assert!(indices.iter().all(|&i| i < 25));
    }

    #[test]
    fn test_flat_quad_normals() {
        // Unit quad in the z = 0 plane, counter-clockwise seen from +z.
        let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let normals = vertex_normals(&positions, &grid_indices(1));
        for n in normals.chunks_exact(3) {
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_isolated_vertex_uses_radial_normal() {
        let positions = vec![0.0, 2.0, 0.0];
        let normals = vertex_normals(&positions, &[]);
        assert_eq!(normals, vec![0.0, 1.0, 0.0]);
    }
}
