//! Per-face rebuild and visibility state.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, error, trace};

use super::controller::LodController;
use super::frustum::{Camera, Frustum};
use super::rebuild::{
    spawn_rebuild, ProgressCallback, RebuildError, RebuildEvent, RebuildMode, RebuildStatus, StatusCallback,
};
use crate::geometry::{face_direction, CubeFaceId, FaceMesh, GeometryBuilder};

/// Whether a chunk has a rebuild in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    Idle,
    Rebuilding,
}

/// One cube face: its current mesh, detail level and visibility.
pub struct FaceChunk {
    face: CubeFaceId,
    base_resolution: u32,
    level: u32,
    resolution: u32,
    mode: RebuildMode,
    state: ChunkState,
    mesh: Option<Arc<FaceMesh>>,
    visible: bool,
    center: Vec3,
    bounding_radius: f32,
    invalidated: bool,
    failed_resolution: Option<u32>,
    building: Option<u32>,
    pending: Option<Receiver<RebuildEvent>>,
    dropped_requests: u64,
    on_progress: Option<ProgressCallback>,
    on_status: Option<StatusCallback>,
}

impl FaceChunk {
    pub fn new(face: CubeFaceId, base_resolution: u32, radius: f32, mode: RebuildMode) -> Self {
        Self {
            face,
            base_resolution,
            level: 0,
            resolution: LodController::resolution_for(base_resolution, 0),
            mode,
            state: ChunkState::Idle,
            mesh: None,
            visible: false,
            center: face_direction(face, 0.0, 0.0) * radius,
            // Covers the whole face for any height in [-1, 1] until a mesh
            // provides the real extent.
            bounding_radius: radius * 2.0,
            invalidated: false,
            failed_resolution: None,
            building: None,
            pending: None,
            dropped_requests: 0,
            on_progress: None,
            on_status: None,
        }
    }

    pub fn face(&self) -> CubeFaceId {
        self.face
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn is_rebuilding(&self) -> bool {
        self.state == ChunkState::Rebuilding
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mesh(&self) -> Option<&Arc<FaceMesh>> {
        self.mesh.as_ref()
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }

    /// Rebuild requests ignored because one was already running.
    pub fn dropped_requests(&self) -> u64 {
        self.dropped_requests
    }

    pub fn set_progress_callback(&mut self, callback: impl FnMut(f32) + Send + 'static) {
        self.on_progress = Some(Box::new(callback));
    }

    pub fn set_status_callback(&mut self, callback: impl FnMut(&RebuildStatus) + Send + 'static) {
        self.on_status = Some(Box::new(callback));
    }

    /// Marks the current mesh as out of date, e.g. after the height source
    /// changed.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
        self.failed_resolution = None;
    }

    /// Whether the installed mesh no longer matches the chunk's target.
    pub fn is_stale(&self) -> bool {
        if self.invalidated {
            return true;
        }
        let mesh_resolution = self.mesh.as_ref().map(|m| m.resolution);
        mesh_resolution != Some(self.resolution) && self.failed_resolution != Some(self.resolution)
    }

    /// Runs one update cycle: collects a finished rebuild, retargets the
    /// detail level, starts a rebuild when stale and refreshes visibility.
    pub fn update(&mut self, camera: &Camera, lod: &LodController, frustum: &Frustum, builder: &Arc<GeometryBuilder>) {
        self.collect();

        let distance = camera.position.distance(self.center);
        let level = lod.target_level(distance);
        if level != self.level {
            debug!(face = %self.face, from = self.level, to = level, distance, "lod change");
            self.level = level;
            self.resolution = LodController::resolution_for(self.base_resolution, level);
        }

        if self.is_stale() && self.request_rebuild(builder) && self.mode == RebuildMode::Inline {
            self.collect();
        }

        self.visible = frustum.intersects_sphere(self.center, self.bounding_radius);
    }

    /// Starts a rebuild at the current resolution.
    ///
    /// Returns `false` when a rebuild is already running; the request is
    /// dropped and the chunk rebuilds again afterwards if still stale. The
    /// result is installed by the next `update` or [`FaceChunk::wait`].
    pub fn request_rebuild(&mut self, builder: &Arc<GeometryBuilder>) -> bool {
        if self.state == ChunkState::Rebuilding {
            self.dropped_requests += 1;
            trace!(face = %self.face, "rebuild already running, request dropped");
            return false;
        }
        self.start(builder, self.mode);
        true
    }

    /// Blocks until the running rebuild, if any, has finished and installed
    /// its mesh.
    pub fn wait(&mut self) -> Result<(), RebuildError> {
        self.drain(true)
    }

    /// Rebuilds on the calling thread regardless of the chunk's mode, after
    /// finishing any rebuild already running.
    pub fn rebuild_now(&mut self, builder: &Arc<GeometryBuilder>) -> Result<(), RebuildError> {
        self.wait()?;
        self.start(builder, RebuildMode::Inline);
        self.wait()
    }

    fn start(&mut self, builder: &Arc<GeometryBuilder>, mode: RebuildMode) {
        let (tx, rx) = mpsc::channel();
        self.state = ChunkState::Rebuilding;
        self.invalidated = false;
        self.building = Some(self.resolution);
        self.pending = Some(rx);
        debug!(face = %self.face, resolution = self.resolution, ?mode, "rebuild started");

        spawn_rebuild(mode, builder.clone(), self.face, self.resolution, tx);
    }

    fn collect(&mut self) {
        if let Err(err) = self.drain(false) {
            error!(face = %self.face, %err, "rebuild failed, keeping previous mesh");
        }
    }

    /// Processes queued rebuild events. Progress and status are coalesced to
    /// the latest value seen.
    fn drain(&mut self, block: bool) -> Result<(), RebuildError> {
        let Some(rx) = self.pending.take() else {
            return Ok(());
        };

        let mut progress = None;
        let mut status = None;
        let mut outcome = None;

        loop {
            let event = if block {
                rx.recv().map_err(|_| TryRecvError::Disconnected)
            } else {
                rx.try_recv()
            };
            match event {
                Ok(RebuildEvent::Progress(p)) => progress = Some(p),
                Ok(RebuildEvent::Status(s)) => status = Some(s),
                Ok(RebuildEvent::Done(result)) => {
                    outcome = Some(result.map_err(RebuildError::from));
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    outcome = Some(Err(RebuildError::Disconnected(self.face)));
                    break;
                }
            }
        }

        if let (Some(p), Some(callback)) = (progress, self.on_progress.as_mut()) {
            callback(p);
        }
        if let (Some(s), Some(callback)) = (status.as_ref(), self.on_status.as_mut()) {
            callback(s);
        }

        match outcome {
            None => {
                self.pending = Some(rx);
                Ok(())
            }
            Some(result) => {
                self.state = ChunkState::Idle;
                let requested = self.building.take();
                match result {
                    Ok(mesh) => {
                        self.install(mesh);
                        Ok(())
                    }
                    Err(err) => {
                        self.failed_resolution = requested;
                        Err(err)
                    }
                }
            }
        }
    }

    fn install(&mut self, mesh: FaceMesh) {
        self.bounding_radius = mesh.bounding_radius(self.center);
        debug!(
            face = %self.face,
            resolution = mesh.resolution,
            vertices = mesh.vertex_count(),
            "mesh installed"
        );
        self.mesh = Some(Arc::new(mesh));
    }
}

impl std::fmt::Debug for FaceChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceChunk")
            .field("face", &self.face)
            .field("level", &self.level)
            .field("resolution", &self.resolution)
            .field("state", &self.state)
            .field("visible", &self.visible)
            .field("bounding_radius", &self.bounding_radius)
            .finish_non_exhaustive()
    }
}
