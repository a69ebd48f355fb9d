//! Face rebuild execution and progress reporting.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{CubeFaceId, FaceMesh, GeometryBuilder, GeometryError};

/// Where a face rebuild runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildMode {
    /// On the calling thread, completing before `update` returns.
    Inline,
    /// On the rayon pool; results are collected on a later `update`.
    #[default]
    Pooled,
}

/// Human-readable progress of a running rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuildStatus {
    pub task: String,
    pub subtask: String,
    /// Fraction complete, in [0, 1].
    pub progress: f32,
}

/// Errors surfaced by a rebuild.
#[derive(Debug, Error)]
pub enum RebuildError {
    #[error("rebuild worker for face {0} exited without a result")]
    Disconnected(CubeFaceId),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Receives the fraction of the rebuild completed.
pub type ProgressCallback = Box<dyn FnMut(f32) + Send>;
/// Receives the latest status of a rebuild.
pub type StatusCallback = Box<dyn FnMut(&RebuildStatus) + Send>;

/// Messages sent from a rebuild to the owning chunk.
#[derive(Debug)]
pub enum RebuildEvent {
    Progress(f32),
    Status(RebuildStatus),
    Done(Result<FaceMesh, GeometryError>),
}

/// Builds `face` row by row, reporting each row over `events`.
///
/// A closed receiver only means nobody is listening anymore, so send
/// failures are ignored.
pub fn run_rebuild(builder: &GeometryBuilder, face: CubeFaceId, resolution: u32, events: &Sender<RebuildEvent>) {
    let mut task = match builder.start_face(face, resolution) {
        Ok(task) => task,
        Err(err) => {
            let _ = events.send(RebuildEvent::Done(Err(err)));
            return;
        }
    };

    let label = format!("Rebuilding face {}", face);
    loop {
        let done = task.step();
        let progress = task.progress();
        let _ = events.send(RebuildEvent::Progress(progress));
        let _ = events.send(RebuildEvent::Status(RebuildStatus {
            task: label.clone(),
            subtask: format!("row {}/{}", task.rows_done(), task.rows()),
            progress,
        }));
        if done {
            break;
        }
    }

    let _ = events.send(RebuildEvent::Done(Ok(task.finish())));
}

/// Runs [`run_rebuild`] according to `mode`.
pub fn spawn_rebuild(
    mode: RebuildMode,
    builder: Arc<GeometryBuilder>,
    face: CubeFaceId,
    resolution: u32,
    events: Sender<RebuildEvent>,
) {
    match mode {
        RebuildMode::Inline => run_rebuild(&builder, face, resolution, &events),
        RebuildMode::Pooled => rayon::spawn(move || run_rebuild(&builder, face, resolution, &events)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_events_end_with_mesh() {
        let builder = GeometryBuilder::flat(1.0);
        let (tx, rx) = mpsc::channel();
        run_rebuild(&builder, CubeFaceId::PosX, 4, &tx);
        drop(tx);

        let events: Vec<RebuildEvent> = rx.iter().collect();
        let progress: Vec<f32> = events
            .iter()
            .filter_map(|e| match e {
                RebuildEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 5);
        assert!(progress.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(progress.last(), Some(&1.0));

        match events.last() {
            Some(RebuildEvent::Done(Ok(mesh))) => assert_eq!(mesh.resolution, 4),
            other => panic!("expected a finished mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_status_names_face_and_row() {
        let builder = GeometryBuilder::flat(1.0);
        let (tx, rx) = mpsc::channel();
        run_rebuild(&builder, CubeFaceId::NegY, 2, &tx);
        drop(tx);

        let first = rx
            .iter()
            .find_map(|e| match e {
                RebuildEvent::Status(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(first.task, "Rebuilding face ny");
        assert_eq!(first.subtask, "row 1/3");
    }

    #[test]
    fn test_pooled_matches_inline() {
        let builder = Arc::new(GeometryBuilder::new(
            crate::geometry::HeightSource::function(crate::terrain::ModifierStack::terraced(4)),
            2.0,
        ));
        let collect = |mode| {
            let (tx, rx) = mpsc::channel();
            spawn_rebuild(mode, builder.clone(), CubeFaceId::PosY, 6, tx);
            rx.iter()
                .find_map(|e| match e {
                    RebuildEvent::Done(result) => Some(result.unwrap()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(collect(RebuildMode::Inline), collect(RebuildMode::Pooled));
    }
}
