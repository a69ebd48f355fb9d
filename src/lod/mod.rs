//! Level of detail and incremental face rebuilds.
//!
//! Each [`FaceChunk`] picks a detail level from its distance to the camera
//! via the [`LodController`], rebuilds its mesh when the level or the height
//! source changes, and tracks visibility against the camera [`Frustum`].

mod chunk;
mod controller;
mod frustum;
mod rebuild;

pub use chunk::{ChunkState, FaceChunk};
pub use controller::LodController;
pub use frustum::{Camera, Frustum};
pub use rebuild::{
    run_rebuild, spawn_rebuild, ProgressCallback, RebuildError, RebuildEvent, RebuildMode, RebuildStatus,
    StatusCallback,
};
