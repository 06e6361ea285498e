//! Fragment stage of the chunk shader, evaluated on the CPU.
//!
//! Builds the lighting input record from interpolated vertex outputs and the
//! chunk material, then hands it to the lighting collaborator. Mirrors
//! `fragment` in `shaders/chunk.wgsl`.

use bevy::math::{Vec3, Vec4};

use crate::collaborators::{MeshFunctions, PbrFunctions, PbrInput};
use crate::material::ChunkMaterial;
use crate::shading::VertexOutput;

/// Chunk faces are single sided.
pub const DOUBLE_SIDED: bool = false;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingFragment {
    pub frag_coord: Vec4,
    pub world_position: Vec4,
    pub world_normal: Vec3,
    pub ambient: f32,
    pub blend_color: Vec3,
    pub instance_index: u32,
    pub is_front: bool,
}

impl From<VertexOutput> for ShadingFragment {
    fn from(out: VertexOutput) -> Self {
        Self {
            frag_coord: out.clip_position,
            world_position: out.world_position,
            world_normal: out.world_normal,
            ambient: out.ambient,
            blend_color: out.blend_color,
            instance_index: out.instance_index,
            is_front: true,
        }
    }
}

/// Blends three vertex outputs with barycentric weights, the way the
/// rasterizer would (without perspective correction). The instance index is
/// flat and comes from the first vertex.
pub fn interpolate(
    a: &VertexOutput,
    b: &VertexOutput,
    c: &VertexOutput,
    weights: Vec3,
) -> ShadingFragment {
    let w = weights / (weights.x + weights.y + weights.z);
    ShadingFragment {
        frag_coord: a.clip_position * w.x + b.clip_position * w.y + c.clip_position * w.z,
        world_position: a.world_position * w.x + b.world_position * w.y + c.world_position * w.z,
        world_normal: a.world_normal * w.x + b.world_normal * w.y + c.world_normal * w.z,
        ambient: a.ambient * w.x + b.ambient * w.y + c.ambient * w.z,
        blend_color: a.blend_color * w.x + b.blend_color * w.y + c.blend_color * w.z,
        instance_index: a.instance_index,
        is_front: true,
    }
}

pub fn build_pbr_input(
    fragment: &ShadingFragment,
    material: &ChunkMaterial,
    mesh: &impl MeshFunctions,
    pbr: &impl PbrFunctions,
) -> PbrInput {
    let mut input = pbr.pbr_input_new();
    input.flags = mesh.mesh_flags(fragment.instance_index);
    input.is_orthographic = pbr.is_orthographic();
    input.v = pbr.calculate_view(fragment.world_position, input.is_orthographic);
    input.frag_coord = fragment.frag_coord;
    input.world_position = fragment.world_position;
    input.world_normal =
        pbr.prepare_world_normal(fragment.world_normal, DOUBLE_SIDED, fragment.is_front);
    input.n = input.world_normal.normalize_or_zero();

    input.material.base_color = fragment.blend_color.extend(1.0);
    input.material.apply_chunk_material(material);
    input
}

pub fn fragment_stage(
    fragment: &ShadingFragment,
    material: &ChunkMaterial,
    mesh: &impl MeshFunctions,
    pbr: &impl PbrFunctions,
) -> Vec4 {
    let input = build_pbr_input(fragment, material, mesh, pbr);
    let color = pbr.apply_pbr_lighting(&input);
    pbr.main_pass_post_lighting_processing(&input, color)
}
