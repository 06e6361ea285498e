//! Vertex stage of the chunk shader, evaluated on the CPU.
//!
//! Mirrors `vertex` in `shaders/chunk.wgsl`. Keep the two in sync: the tables
//! and the blend below are what the GPU computes for every chunk vertex.

use bevy::math::{Vec3, Vec4};
use vx_utils::{NORMALS, PackedVertex, VertexError, VertexFields};

use crate::collaborators::MeshFunctions;

/// Ambient weight per AO level, 0 = unoccluded.
pub const AMBIENT_LERPS: [f32; 4] = [1.0, 0.7, 0.5, 0.15];

/// Tint at world height 0.
pub const HIGH_COLOR: Vec3 = Vec3::new(5.0, 0.2, 5.0);
/// Tint at world height `BLEND_HEIGHT`.
pub const LOW_COLOR: Vec3 = Vec3::new(1.0, 1.0, 9.0);
pub const BLEND_HEIGHT: f32 = 32.0;

pub const MAX_NORMAL_INDEX: u32 = NORMALS.len() as u32 - 1;
pub const MAX_AMBIENT_LEVEL: u32 = AMBIENT_LERPS.len() as u32 - 1;

/// Ambient weight for an AO level. Levels past the table clamp to the darkest entry.
pub fn ambient_lerp(ao: u32) -> f32 {
    AMBIENT_LERPS[ao.min(MAX_AMBIENT_LEVEL) as usize]
}

/// Face normal for a normal index. Indices 6 and 7 clamp to the last face (Down).
pub fn face_normal(normal_index: u32) -> Vec3 {
    Vec3::from_array(NORMALS[normal_index.min(MAX_NORMAL_INDEX) as usize])
}

/// Height tint. Extrapolates past [0, BLEND_HEIGHT] on purpose.
pub fn blend_color(height: f32) -> Vec3 {
    let t = height / BLEND_HEIGHT;
    LOW_COLOR * t + HIGH_COLOR * (1.0 - t)
}

/// Decodes the fields and fails on indices the shading tables do not cover,
/// for callers that prefer an error over the clamping the shader applies.
pub fn decode_checked(packed: PackedVertex) -> Result<VertexFields, VertexError> {
    let fields = packed.decode();
    if fields.normal_index > MAX_NORMAL_INDEX {
        return Err(VertexError::InvalidNormalIndex(fields.normal_index));
    }
    if fields.ao > MAX_AMBIENT_LEVEL {
        return Err(VertexError::InvalidAmbientLevel(fields.ao));
    }
    Ok(fields)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedVertex {
    pub local_position: Vec3,
    pub world_position: Vec4,
    pub world_normal: Vec3,
    pub ambient: f32,
    pub instance_index: u32,
}

/// What the vertex stage hands to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    pub world_normal: Vec3,
    pub ambient: f32,
    pub world_position: Vec4,
    /// Height tint already scaled by `ambient`.
    pub blend_color: Vec3,
    pub instance_index: u32,
}

pub fn decode_vertex(
    packed: PackedVertex,
    instance_index: u32,
    mesh: &impl MeshFunctions,
) -> DecodedVertex {
    let local_position = Vec3::new(packed.x() as f32, packed.y() as f32, packed.z() as f32);
    let world_from_local = mesh.world_from_local(instance_index);
    DecodedVertex {
        local_position,
        world_position: mesh
            .mesh_position_local_to_world(world_from_local, local_position.extend(1.0)),
        world_normal: mesh
            .mesh_normal_local_to_world(face_normal(packed.normal_index()), instance_index),
        ambient: ambient_lerp(packed.ao()),
        instance_index,
    }
}

pub fn vertex_stage(
    packed: PackedVertex,
    instance_index: u32,
    mesh: &impl MeshFunctions,
) -> VertexOutput {
    let decoded = decode_vertex(packed, instance_index, mesh);
    let world_from_local = mesh.world_from_local(instance_index);
    VertexOutput {
        clip_position: mesh
            .mesh_position_local_to_clip(world_from_local, decoded.local_position.extend(1.0)),
        world_normal: decoded.world_normal,
        ambient: decoded.ambient,
        world_position: decoded.world_position,
        blend_color: blend_color(decoded.world_position.y) * decoded.ambient,
        instance_index,
    }
}

#[cfg(test)]
mod tests;
#[cfg(test)]
mod wgsl_source;
