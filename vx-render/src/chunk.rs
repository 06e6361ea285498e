use std::collections::HashMap;
use std::sync::Arc;

use bevy::prelude::*;
use bevy::render::primitives::Aabb;
use vx_utils::{CHUNK_SIZE, Chunk, ChunkPos};

use crate::mesher::ChunkNeighbourhood;

/// Chunks waiting to be (re)meshed.
#[derive(Resource, Default)]
pub struct ChunkUpdateQueue(pub Vec<(ChunkPos, Chunk)>);

#[derive(Resource, Default)]
pub struct ChunkStore {
    pub chunks: HashMap<ChunkPos, Arc<Chunk>>,
}

impl ChunkStore {
    pub fn insert(&mut self, pos: ChunkPos, chunk: Chunk) {
        self.chunks.insert(pos, Arc::new(chunk));
    }

    pub fn neighbourhood(&self, pos: ChunkPos) -> ChunkNeighbourhood {
        ChunkNeighbourhood::from_store(&self.chunks, pos)
    }
}

#[derive(Resource, Default)]
pub struct ChunkRenderState {
    pub entries: HashMap<ChunkPos, ChunkEntry>,
}

pub struct ChunkEntry {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
}

/// Chunks whose mesh depends on `pos`: the chunk itself and its 26 neighbours.
pub fn affected_chunks(pos: ChunkPos) -> impl Iterator<Item = ChunkPos> {
    (-1..=1).flat_map(move |dz| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| pos + ChunkPos::new(dx, dy, dz)))
    })
}

/// Local-space bounds of a chunk mesh. Corners reach `CHUNK_SIZE` inclusive.
pub fn chunk_aabb() -> Aabb {
    let half = Vec3::splat(CHUNK_SIZE as f32 * 0.5);
    Aabb {
        center: half.into(),
        half_extents: half.into(),
    }
}
