use std::ops::{Add, Index, IndexMut};

use bevy::math::{IVec3, Vec3};

use crate::voxel::{Voxel, VoxelType};

pub const CHUNK_SIZE: usize = 32;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    /// World-space coordinate of voxel (0, 0, 0) of this chunk.
    pub fn world_origin(self) -> IVec3 {
        self.to_ivec3() * CHUNK_SIZE as i32
    }

    pub fn translation(self) -> Vec3 {
        self.world_origin().as_vec3()
    }

    /// Chunk containing the given world-space voxel, and the voxel's local position.
    pub fn from_world(world: IVec3) -> (Self, VoxelPos) {
        let size = CHUNK_SIZE as i32;
        let chunk = world.div_euclid(IVec3::splat(size));
        let local = world.rem_euclid(IVec3::splat(size));
        (
            chunk.into(),
            VoxelPos::new(local.x as usize, local.y as usize, local.z as usize),
        )
    }
}

impl From<(i32, i32, i32)> for ChunkPos {
    fn from(pos: (i32, i32, i32)) -> Self {
        Self::new(pos.0, pos.1, pos.2)
    }
}

impl From<IVec3> for ChunkPos {
    fn from(pos: IVec3) -> Self {
        Self::new(pos.x, pos.y, pos.z)
    }
}

impl Add for ChunkPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl VoxelPos {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    pub const fn to_index(self) -> usize {
        self.x + self.y * CHUNK_SIZE + self.z * CHUNK_SIZE * CHUNK_SIZE
    }

    pub const fn from_index(index: usize) -> Self {
        Self {
            x: index % CHUNK_SIZE,
            y: (index / CHUNK_SIZE) % CHUNK_SIZE,
            z: index / (CHUNK_SIZE * CHUNK_SIZE),
        }
    }

    pub fn to_ivec3(self) -> IVec3 {
        IVec3::new(self.x as i32, self.y as i32, self.z as i32)
    }
}

impl From<(usize, usize, usize)> for VoxelPos {
    fn from(pos: (usize, usize, usize)) -> Self {
        Self::new(pos.0, pos.1, pos.2)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    voxels: Box<[Voxel; CHUNK_VOLUME]>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            voxels: Box::new([Voxel::AIR; CHUNK_VOLUME]),
        }
    }
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every voxel for which `solid(world_position)` holds.
    pub fn from_solid_fn(chunk_pos: ChunkPos, mut solid: impl FnMut(IVec3) -> bool) -> Self {
        let mut chunk = Self::default();
        let origin = chunk_pos.world_origin();
        for index in 0..CHUNK_VOLUME {
            let pos = VoxelPos::from_index(index);
            if solid(origin + pos.to_ivec3()) {
                chunk.voxels[index].voxel_type = VoxelType::Block;
            }
        }
        chunk
    }

    pub fn get(&self, pos: VoxelPos) -> Voxel {
        self.voxels[pos.to_index()]
    }

    pub fn set(&mut self, pos: VoxelPos, voxel_type: VoxelType) {
        assert!(
            pos.x < CHUNK_SIZE && pos.y < CHUNK_SIZE && pos.z < CHUNK_SIZE,
            "voxel position out of chunk: {pos:?}"
        );
        self.voxels[pos.to_index()].voxel_type = voxel_type;
    }

    pub fn set_voxels(&mut self, voxels: impl IntoIterator<Item = (VoxelPos, VoxelType)>) {
        for (pos, voxel_type) in voxels {
            self.set(pos, voxel_type);
        }
    }

    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.solid_count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.solid_count() == CHUNK_VOLUME
    }
}

impl Index<VoxelPos> for Chunk {
    type Output = Voxel;

    fn index(&self, pos: VoxelPos) -> &Self::Output {
        &self.voxels[pos.to_index()]
    }
}

impl IndexMut<VoxelPos> for Chunk {
    fn index_mut(&mut self, pos: VoxelPos) -> &mut Self::Output {
        &mut self.voxels[pos.to_index()]
    }
}
