//! Off-thread chunk meshing.
//!
//! [`MeshScheduler`] decides which chunks need a mesh and keeps at most one
//! job per chunk running. [`MeshWorker`] runs the jobs on tokio's blocking
//! pool and hands results back through a channel drained once per frame.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Instant;

use bevy::prelude::*;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use vx_utils::ChunkPos;

use crate::chunk::ChunkStore;
use crate::mesher::{ChunkMesh, ChunkNeighbourhood, build_chunk_mesh};

pub struct MeshJob {
    pub chunk_pos: ChunkPos,
    pub neighbourhood: ChunkNeighbourhood,
}

impl MeshJob {
    pub fn run(self) -> MeshResult {
        let start = Instant::now();
        let mesh = build_chunk_mesh(&self.neighbourhood);
        MeshResult {
            chunk_pos: self.chunk_pos,
            mesh,
            build_ms: start.elapsed().as_secs_f32() * 1000.0,
        }
    }
}

pub struct MeshResult {
    pub chunk_pos: ChunkPos,
    pub mesh: ChunkMesh,
    pub build_ms: f32,
}

#[derive(Resource)]
pub struct MeshWorker {
    runtime: Runtime,
    result_tx: UnboundedSender<MeshResult>,
    result_rx: Mutex<UnboundedReceiver<MeshResult>>,
}

impl FromWorld for MeshWorker {
    fn from_world(_world: &mut World) -> Self {
        let runtime = Builder::new_multi_thread()
            .thread_name("vx-mesh")
            .build()
            .expect("failed to start mesh worker runtime");
        let (result_tx, result_rx) = unbounded_channel();
        Self {
            runtime,
            result_tx,
            result_rx: Mutex::new(result_rx),
        }
    }
}

impl MeshWorker {
    pub fn submit(&self, job: MeshJob) {
        let result_tx = self.result_tx.clone();
        self.runtime.spawn_blocking(move || {
            // The receiver only goes away with the worker itself.
            let _ = result_tx.send(job.run());
        });
    }

    /// Next finished job, if one is ready.
    pub fn try_recv(&self) -> Option<MeshResult> {
        self.result_rx.lock().ok()?.try_recv().ok()
    }

    #[cfg(test)]
    pub(crate) fn recv_blocking(&self) -> Option<MeshResult> {
        let mut rx = self.result_rx.lock().ok()?;
        self.runtime.block_on(rx.recv())
    }
}

/// Chunks waiting for a mesh and chunks with a job running.
///
/// A chunk requested while its job runs stays requested; the running job
/// meshes an older neighbourhood snapshot, so it goes out again once that
/// job lands.
#[derive(Resource, Default, Debug)]
pub struct MeshScheduler {
    running: HashSet<ChunkPos>,
    requested: HashSet<ChunkPos>,
}

impl MeshScheduler {
    pub fn request(&mut self, pos: ChunkPos) {
        self.requested.insert(pos);
    }

    pub fn running(&self) -> usize {
        self.running.len()
    }

    pub fn is_running(&self, pos: ChunkPos) -> bool {
        self.running.contains(&pos)
    }

    pub fn is_requested(&self, pos: ChunkPos) -> bool {
        self.requested.contains(&pos)
    }

    /// Submits a job for every requested chunk that is loaded and idle.
    /// Requests for chunks missing from `store` are dropped. Returns the
    /// number of jobs submitted.
    pub fn dispatch(&mut self, store: &ChunkStore, worker: &MeshWorker) -> usize {
        let mut sent = 0;
        self.requested.retain(|&pos| {
            if self.running.contains(&pos) {
                return true;
            }
            if !store.chunks.contains_key(&pos) {
                return false;
            }
            worker.submit(MeshJob {
                chunk_pos: pos,
                neighbourhood: store.neighbourhood(pos),
            });
            self.running.insert(pos);
            sent += 1;
            false
        });
        sent
    }

    /// Marks the job for `pos` as landed. Returns `true` when the chunk was
    /// requested again meanwhile, i.e. the result is already stale.
    pub fn complete(&mut self, pos: ChunkPos) -> bool {
        self.running.remove(&pos);
        self.requested.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vx_utils::{Chunk, VoxelPos, VoxelType};

    use super::*;

    fn single_block(pos: VoxelPos) -> Chunk {
        let mut chunk = Chunk::new();
        chunk.set(pos, VoxelType::Block);
        chunk
    }

    #[test]
    fn worker_returns_built_mesh() {
        let worker = MeshWorker::from_world(&mut World::new());
        let pos = ChunkPos::new(2, 0, -1);
        let mut neighbourhood = ChunkNeighbourhood::new(pos);
        neighbourhood.insert(
            ChunkPos::default(),
            Arc::new(single_block(VoxelPos::new(1, 1, 1))),
        );
        worker.submit(MeshJob {
            chunk_pos: pos,
            neighbourhood,
        });

        let result = worker.recv_blocking().unwrap();
        assert_eq!(result.chunk_pos, pos);
        assert_eq!(result.mesh.quad_count(), 6);
    }

    #[test]
    fn requests_for_unloaded_chunks_are_dropped() {
        let worker = MeshWorker::from_world(&mut World::new());
        let mut scheduler = MeshScheduler::default();
        scheduler.request(ChunkPos::new(9, 9, 9));
        assert_eq!(scheduler.dispatch(&ChunkStore::default(), &worker), 0);
        assert!(!scheduler.is_requested(ChunkPos::new(9, 9, 9)));
    }

    #[test]
    fn request_during_running_job_is_sent_after_it_lands() {
        let worker = MeshWorker::from_world(&mut World::new());
        let mut store = ChunkStore::default();
        let pos = ChunkPos::default();
        store.insert(pos, single_block(VoxelPos::new(31, 0, 0)));

        let mut scheduler = MeshScheduler::default();
        scheduler.request(pos);
        assert_eq!(scheduler.dispatch(&store, &worker), 1);
        assert!(scheduler.is_running(pos));

        // A neighbour arrives while the first job is still out.
        store.insert(ChunkPos::new(1, 0, 0), single_block(VoxelPos::new(0, 0, 0)));
        scheduler.request(pos);
        assert_eq!(scheduler.dispatch(&store, &worker), 0);
        assert!(scheduler.is_requested(pos));

        let first = worker.recv_blocking().unwrap();
        assert_eq!(first.mesh.quad_count(), 6);
        assert!(scheduler.complete(first.chunk_pos));

        assert_eq!(scheduler.dispatch(&store, &worker), 1);
        let second = worker.recv_blocking().unwrap();
        assert!(!scheduler.complete(second.chunk_pos));
        // The face against the new neighbour is culled this time.
        assert_eq!(second.mesh.quad_count(), 5);
        assert_eq!(scheduler.running(), 0);
    }
}
