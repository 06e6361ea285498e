//! Contracts the chunk shader consumes from the mesh and PBR shader libraries.
//!
//! On the GPU these are `bevy_pbr::mesh_functions` and `bevy_pbr::pbr_functions`.
//! The shading stages are written against these traits so the same logic can
//! run on the CPU with [`InstanceTable`] and [`crate::lighting::ReferenceLighting`].

use bevy::math::{Mat3, Mat4, Vec3, Vec4};

use crate::material::ChunkMaterial;

pub trait MeshFunctions {
    fn world_from_local(&self, instance_index: u32) -> Mat4;

    fn mesh_position_local_to_clip(&self, world_from_local: Mat4, position: Vec4) -> Vec4;

    fn mesh_position_local_to_world(&self, world_from_local: Mat4, position: Vec4) -> Vec4 {
        world_from_local * position
    }

    /// Must stay correct under non-uniform scale.
    fn mesh_normal_local_to_world(&self, normal: Vec3, instance_index: u32) -> Vec3;

    fn mesh_flags(&self, instance_index: u32) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbrMaterialInput {
    pub base_color: Vec4,
    pub reflectance: f32,
    pub perceptual_roughness: f32,
    pub metallic: f32,
    pub flags: u32,
    pub alpha_cutoff: f32,
}

impl Default for PbrMaterialInput {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            reflectance: 0.5,
            perceptual_roughness: 0.5,
            metallic: 0.0,
            flags: 0,
            alpha_cutoff: 0.5,
        }
    }
}

impl PbrMaterialInput {
    pub fn apply_chunk_material(&mut self, material: &ChunkMaterial) {
        self.reflectance = material.reflectance;
        self.perceptual_roughness = material.perceptual_roughness;
        self.metallic = material.metallic;
    }
}

/// Input record for the lighting evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PbrInput {
    pub material: PbrMaterialInput,
    pub frag_coord: Vec4,
    pub world_position: Vec4,
    pub world_normal: Vec3,
    pub n: Vec3,
    pub v: Vec3,
    pub is_orthographic: bool,
    pub flags: u32,
}

impl Default for PbrInput {
    fn default() -> Self {
        Self {
            material: PbrMaterialInput::default(),
            frag_coord: Vec4::ZERO,
            world_position: Vec4::ZERO,
            world_normal: Vec3::Y,
            n: Vec3::Y,
            v: Vec3::Z,
            is_orthographic: false,
            flags: 0,
        }
    }
}

pub trait PbrFunctions {
    fn pbr_input_new(&self) -> PbrInput {
        PbrInput::default()
    }

    fn is_orthographic(&self) -> bool;

    fn calculate_view(&self, world_position: Vec4, is_orthographic: bool) -> Vec3;

    fn prepare_world_normal(&self, world_normal: Vec3, double_sided: bool, is_front: bool) -> Vec3 {
        if double_sided && !is_front {
            -world_normal
        } else {
            world_normal
        }
    }

    fn apply_pbr_lighting(&self, input: &PbrInput) -> Vec4;

    fn main_pass_post_lighting_processing(&self, input: &PbrInput, color: Vec4) -> Vec4;

    fn alpha_discard(&self, material: &PbrMaterialInput, color: Vec4) -> Vec4 {
        let _ = material;
        color
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub world_from_local: Mat4,
    pub flags: u32,
}

impl Default for MeshInstance {
    fn default() -> Self {
        Self {
            world_from_local: Mat4::IDENTITY,
            flags: 0,
        }
    }
}

/// Per-instance transforms and flags plus the camera's view-projection.
/// Indices without an entry resolve to the identity transform and no flags.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceTable {
    pub clip_from_world: Mat4,
    pub instances: Vec<MeshInstance>,
}

impl Default for InstanceTable {
    fn default() -> Self {
        Self {
            clip_from_world: Mat4::IDENTITY,
            instances: Vec::new(),
        }
    }
}

impl InstanceTable {
    pub fn new(clip_from_world: Mat4) -> Self {
        Self {
            clip_from_world,
            instances: Vec::new(),
        }
    }

    pub fn push(&mut self, instance: MeshInstance) -> u32 {
        self.instances.push(instance);
        self.instances.len() as u32 - 1
    }

    fn instance(&self, instance_index: u32) -> MeshInstance {
        self.instances
            .get(instance_index as usize)
            .copied()
            .unwrap_or_default()
    }
}

impl MeshFunctions for InstanceTable {
    fn world_from_local(&self, instance_index: u32) -> Mat4 {
        self.instance(instance_index).world_from_local
    }

    fn mesh_position_local_to_clip(&self, world_from_local: Mat4, position: Vec4) -> Vec4 {
        self.clip_from_world * (world_from_local * position)
    }

    fn mesh_normal_local_to_world(&self, normal: Vec3, instance_index: u32) -> Vec3 {
        let linear = Mat3::from_mat4(self.world_from_local(instance_index));
        if linear.determinant() == 0.0 {
            return normal;
        }
        (linear.inverse().transpose() * normal).normalize_or_zero()
    }

    fn mesh_flags(&self, instance_index: u32) -> u32 {
        self.instance(instance_index).flags
    }
}
