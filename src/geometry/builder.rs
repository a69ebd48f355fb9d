//! Face mesh construction over the cube-sphere.
//!
//! [`GeometryBuilder::build_face`] builds a whole face at once.
//! [`FaceBuildTask`] builds the same mesh one grid row per step so callers can
//! report progress; both paths share the row code and produce identical output.

use glam::Vec3;
use thiserror::Error;
use tracing::debug;

use super::cube_sphere::{face_direction, grid_coord};
use super::face::CubeFaceId;
use super::mesh::{grid_indices, vertex_normals, FaceMesh};
use super::source::HeightSource;
use crate::terrain::clamp_height;

/// Largest grid resolution a face build accepts. Larger requests are capped.
pub const MAX_RESOLUTION: u32 = 1 << 14;

/// Errors raised while building face geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("height buffer for face {face} has {actual} samples, expected {expected}")]
    BufferSize {
        face: CubeFaceId,
        expected: usize,
        actual: usize,
    },
}

/// Builds displaced face meshes from a height source.
///
/// Cloning is cheap: sources are shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    source: HeightSource,
    radius: f32,
}

impl GeometryBuilder {
    pub fn new(source: HeightSource, radius: f32) -> Self {
        Self { source, radius }
    }

    /// A builder producing a perfect sphere.
    pub fn flat(radius: f32) -> Self {
        Self::new(HeightSource::Flat, radius)
    }

    pub fn source(&self) -> &HeightSource {
        &self.source
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns a copy of this builder using `source`.
    pub fn with_source(&self, source: HeightSource) -> Self {
        Self::new(source, self.radius)
    }

    /// Builds the full mesh for `face` at `resolution` cells per edge.
    pub fn build_face(&self, face: CubeFaceId, resolution: u32) -> Result<FaceMesh, GeometryError> {
        Ok(self.start_face(face, resolution)?.finish())
    }

    /// Prepares a progressive build of `face`.
    pub fn start_face(&self, face: CubeFaceId, resolution: u32) -> Result<FaceBuildTask, GeometryError> {
        FaceBuildTask::new(self.clone(), face, resolution)
    }

    fn vertex(&self, face: CubeFaceId, u: f32, v: f32, buffered: Option<f32>) -> Vec3 {
        let dir = face_direction(face, u, v);
        let height = match (&self.source, buffered) {
            (_, Some(h)) => h,
            (HeightSource::Function(f), None) => f.height(dir),
            _ => 0.0,
        };
        dir * self.radius * (1.0 + clamp_height(height))
    }
}

/// A face build split into per-row steps.
#[derive(Debug)]
pub struct FaceBuildTask {
    builder: GeometryBuilder,
    face: CubeFaceId,
    resolution: u32,
    buffer: Option<Vec<f32>>,
    positions: Vec<f32>,
    next_row: u32,
}

impl FaceBuildTask {
    /// Prepares the task, fetching the whole height buffer up front when the
    /// source is buffer-based. The resolution is clamped to
    /// `1..=MAX_RESOLUTION`.
    pub fn new(builder: GeometryBuilder, face: CubeFaceId, resolution: u32) -> Result<Self, GeometryError> {
        let resolution = resolution.clamp(1, MAX_RESOLUTION);
        let size = resolution + 1;
        let expected = size as usize * size as usize;

        let buffer = match builder.source() {
            HeightSource::FaceBuffers(backend) => {
                let buffer = backend.generate(face, size);
                if buffer.len() != expected {
                    return Err(GeometryError::BufferSize {
                        face,
                        expected,
                        actual: buffer.len(),
                    });
                }
                Some(buffer)
            }
            _ => None,
        };

        debug!(%face, resolution, source = builder.source().kind(), "starting face build");

        Ok(Self {
            builder,
            face,
            resolution,
            buffer,
            positions: Vec::with_capacity(expected * 3),
            next_row: 0,
        })
    }

    pub fn face(&self) -> CubeFaceId {
        self.face
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Number of vertex rows in the grid.
    pub fn rows(&self) -> u32 {
        self.resolution + 1
    }

    pub fn rows_done(&self) -> u32 {
        self.next_row
    }

    /// Fraction of rows completed, in [0, 1].
    pub fn progress(&self) -> f32 {
        self.next_row as f32 / self.rows() as f32
    }

    pub fn is_done(&self) -> bool {
        self.next_row >= self.rows()
    }

    /// Builds the next row of vertices. Returns `true` once every row is done.
    pub fn step(&mut self) -> bool {
        if self.is_done() {
            return true;
        }
        let y = self.next_row;
        let size = self.rows();
        let v = grid_coord(y, self.resolution);
        for x in 0..size {
            let u = grid_coord(x, self.resolution);
            let buffered = self
                .buffer
                .as_ref()
                .map(|b| b[y as usize * size as usize + x as usize]);
            let p = self.builder.vertex(self.face, u, v, buffered);
            self.positions.extend_from_slice(&[p.x, p.y, p.z]);
        }
        self.next_row += 1;
        self.is_done()
    }

    /// Runs any remaining rows and assembles the mesh.
    pub fn finish(mut self) -> FaceMesh {
        while !self.step() {}
        let indices = grid_indices(self.resolution);
        let normals = vertex_normals(&self.positions, &indices);
        FaceMesh {
            face: self.face,
            resolution: self.resolution,
            positions: self.positions,
            indices,
            normals,
        }
    }
}
