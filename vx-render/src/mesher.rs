//! Culled chunk mesher producing packed vertices.

use std::collections::HashMap;
use std::sync::Arc;

use bevy::math::IVec3;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use vx_utils::{
    CHUNK_SIZE, Chunk, ChunkPos, Direction, PackedVertex, Quad, VertexFields, VoxelPos,
    generate_indices,
};

use crate::material::ATTRIBUTE_VOXEL;

/// A chunk and its 26 neighbours. Missing neighbours read as air.
#[derive(Clone)]
pub struct ChunkNeighbourhood {
    pub center: ChunkPos,
    chunks: [Option<Arc<Chunk>>; 27],
}

impl ChunkNeighbourhood {
    pub fn new(center: ChunkPos) -> Self {
        Self {
            center,
            chunks: std::array::from_fn(|_| None),
        }
    }

    pub fn from_store(store: &HashMap<ChunkPos, Arc<Chunk>>, center: ChunkPos) -> Self {
        let mut neighbourhood = Self::new(center);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let offset = ChunkPos::new(dx, dy, dz);
                    if let Some(chunk) = store.get(&(center + offset)) {
                        neighbourhood.insert(offset, Arc::clone(chunk));
                    }
                }
            }
        }
        neighbourhood
    }

    /// `offset` is relative to the center chunk, each axis in -1..=1.
    pub fn insert(&mut self, offset: ChunkPos, chunk: Arc<Chunk>) {
        self.chunks[Self::slot(offset.to_ivec3())] = Some(chunk);
    }

    pub fn center_chunk(&self) -> Option<&Chunk> {
        self.chunks[Self::slot(IVec3::ZERO)].as_deref()
    }

    fn slot(offset: IVec3) -> usize {
        let o = offset + IVec3::ONE;
        (o.x + o.y * 3 + o.z * 9) as usize
    }

    /// Solidity of a voxel addressed relative to the center chunk's origin.
    pub fn is_solid(&self, pos: IVec3) -> bool {
        let size = CHUNK_SIZE as i32;
        let chunk_offset = pos.div_euclid(IVec3::splat(size));
        if chunk_offset.abs().max_element() > 1 {
            return false;
        }
        let Some(chunk) = &self.chunks[Self::slot(chunk_offset)] else {
            return false;
        };
        let local = pos.rem_euclid(IVec3::splat(size));
        chunk
            .get(VoxelPos::new(local.x as usize, local.y as usize, local.z as usize))
            .is_solid()
    }
}

#[derive(Default, Clone, Debug)]
pub struct ChunkMesh {
    pub vertices: Vec<PackedVertex>,
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// AO level 0..=3 for one face corner: two solid sides fully occlude,
/// otherwise count the solid sides and the diagonal.
pub fn corner_ao(
    neighbourhood: &ChunkNeighbourhood,
    voxel: IVec3,
    dir: Direction,
    corner: [u32; 3],
) -> u32 {
    let front = voxel + dir.offset();
    let mut sides = [IVec3::ZERO; 2];
    let mut k = 0;
    for axis in 0..3 {
        if axis == dir.axis() {
            continue;
        }
        sides[k][axis] = if corner[axis] == 1 { 1 } else { -1 };
        k += 1;
    }

    let side1 = neighbourhood.is_solid(front + sides[0]);
    let side2 = neighbourhood.is_solid(front + sides[1]);
    if side1 && side2 {
        return 3;
    }
    let diagonal = neighbourhood.is_solid(front + sides[0] + sides[1]);
    side1 as u32 + side2 as u32 + diagonal as u32
}

fn push_face(
    mesh: &mut ChunkMesh,
    neighbourhood: &ChunkNeighbourhood,
    pos: VoxelPos,
    dir: Direction,
    block: u32,
) {
    let quad = Quad::from_dir([pos.x as u32, pos.y as u32, pos.z as u32], dir);
    let ao = dir
        .corners()
        .map(|corner| corner_ao(neighbourhood, pos.to_ivec3(), dir, corner));

    // Split along the less occluded diagonal so a single dark corner does not
    // bleed across the whole quad.
    let start = if ao[0] + ao[2] > ao[1] + ao[3] { 1 } else { 0 };
    for i in 0..4 {
        let idx = (start + i) % 4;
        let [x, y, z] = quad.corners[idx];
        mesh.vertices.push(
            VertexFields::new(x, y, z, ao[idx], dir.normal_index(), block).pack_unchecked(),
        );
    }
}

pub fn build_chunk_mesh(neighbourhood: &ChunkNeighbourhood) -> ChunkMesh {
    let mut mesh = ChunkMesh::default();
    let Some(chunk) = neighbourhood.center_chunk() else {
        return mesh;
    };
    if chunk.is_empty() {
        return mesh;
    }

    for z in 0..CHUNK_SIZE {
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let pos = VoxelPos::new(x, y, z);
                let voxel = chunk.get(pos);
                if !voxel.is_solid() {
                    continue;
                }
                for dir in Direction::ALL {
                    if neighbourhood.is_solid(pos.to_ivec3() + dir.offset()) {
                        continue;
                    }
                    push_face(
                        &mut mesh,
                        neighbourhood,
                        pos,
                        dir,
                        voxel.voxel_type.block_index(),
                    );
                }
            }
        }
    }

    mesh.indices = generate_indices(mesh.vertices.len());
    mesh
}

pub fn build_mesh(data: &ChunkMesh) -> Mesh {
    let packed: Vec<u32> = data.vertices.iter().map(|v| v.0).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(ATTRIBUTE_VOXEL, packed);
    mesh.insert_indices(Indices::U32(data.indices.clone()));
    mesh
}

#[cfg(test)]
mod tests {
    use vx_utils::VoxelType;

    use super::*;

    fn neighbourhood_with(blocks: &[(usize, usize, usize)]) -> ChunkNeighbourhood {
        let mut chunk = Chunk::new();
        chunk.set_voxels(blocks.iter().map(|&p| (p.into(), VoxelType::Block)));
        let mut n = ChunkNeighbourhood::new(ChunkPos::default());
        n.insert(ChunkPos::default(), Arc::new(chunk));
        n
    }

    #[test]
    fn lone_block_has_six_unoccluded_faces() {
        let mesh = build_chunk_mesh(&neighbourhood_with(&[(4, 4, 4)]));
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.vertices.iter().all(|v| v.ao() == 0));
        assert!(mesh.vertices.iter().all(|v| v.block() == 1));
        let mut normals: Vec<u32> = mesh.vertices.iter().map(|v| v.normal_index()).collect();
        normals.dedup();
        assert_eq!(normals, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn shared_faces_are_culled() {
        let mesh = build_chunk_mesh(&neighbourhood_with(&[(4, 4, 4), (5, 4, 4)]));
        assert_eq!(mesh.quad_count(), 10);
    }

    #[test]
    fn empty_or_missing_chunk_yields_nothing() {
        assert!(build_chunk_mesh(&neighbourhood_with(&[])).is_empty());
        assert!(build_chunk_mesh(&ChunkNeighbourhood::new(ChunkPos::default())).is_empty());
    }

    #[test]
    fn neighbour_chunks_cull_border_faces() {
        let mut n = neighbourhood_with(&[(31, 0, 0)]);
        let mut right = Chunk::new();
        right.set(VoxelPos::new(0, 0, 0), VoxelType::Block);
        n.insert(ChunkPos::new(1, 0, 0), Arc::new(right));
        let mesh = build_chunk_mesh(&n);
        assert_eq!(mesh.quad_count(), 5);
        assert!(mesh.vertices.iter().all(|v| v.normal_index() != 1));
        assert!(mesh.vertices.iter().any(|v| v.x() == 32));
    }

    #[test]
    fn diagonal_neighbour_darkens_near_corners() {
        let mesh = build_chunk_mesh(&neighbourhood_with(&[(0, 0, 0), (1, 1, 0)]));
        let up_face: Vec<_> = mesh
            .vertices
            .iter()
            .filter(|v| v.normal_index() == Direction::Up.normal_index() && v.y() == 1)
            .filter(|v| v.x() <= 1 && v.z() <= 1)
            .collect();
        assert_eq!(up_face.len(), 4);
        for v in up_face {
            let expected = if v.x() == 1 { 1 } else { 0 };
            assert_eq!(v.ao(), expected, "{:?}", v.decode());
        }
    }

    #[test]
    fn corner_ao_saturates_with_two_sides() {
        let n = neighbourhood_with(&[(1, 0, 1), (0, 1, 0), (2, 1, 1), (1, 1, 2)]);
        let ao = corner_ao(&n, IVec3::new(1, 0, 1), Direction::Up, [1, 1, 1]);
        assert_eq!(ao, 3);
        let ao = corner_ao(&n, IVec3::new(1, 0, 1), Direction::Up, [0, 1, 0]);
        assert_eq!(ao, 1);
    }

    #[test]
    fn gpu_mesh_carries_packed_attribute() {
        let data = build_chunk_mesh(&neighbourhood_with(&[(0, 0, 0)]));
        let mesh = build_mesh(&data);
        assert_eq!(mesh.count_vertices(), 24);
        assert!(mesh.attribute(ATTRIBUTE_VOXEL).is_some());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(36));
    }
}
