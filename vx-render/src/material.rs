use bevy::pbr::{MaterialPipeline, MaterialPipelineKey, MeshPipelineKey};
use bevy::prelude::*;
use bevy::render::mesh::{MeshVertexAttribute, MeshVertexBufferLayoutRef};
use bevy::render::render_resource::{
    AsBindGroup, PolygonMode, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
    VertexFormat,
};

use crate::debug::RenderDebugSettings;

pub const CHUNK_VERTEX_SHADER: &str = "shaders/chunk.wgsl";
pub const CHUNK_FRAGMENT_SHADER: &str = "shaders/chunk.wgsl";
/// Depth-only vertex stage for shadow maps; decodes the packed position.
pub const CHUNK_PREPASS_SHADER: &str = "shaders/chunk_prepass.wgsl";

// Custom attributes want a high, arbitrary id so they sort after the built-in ones.
pub const ATTRIBUTE_VOXEL: MeshVertexAttribute =
    MeshVertexAttribute::new("Voxel", 696969696, VertexFormat::Uint32);

/// Surface constants shared by every chunk mesh.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Copy, PartialEq)]
#[bind_group_data(ChunkMaterialKey)]
pub struct ChunkMaterial {
    #[uniform(0)]
    pub reflectance: f32,
    #[uniform(0)]
    pub perceptual_roughness: f32,
    #[uniform(0)]
    pub metallic: f32,
    /// Draws the main pass as lines. Not sent to the GPU; it selects a pipeline.
    pub wireframe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkMaterialKey {
    pub wireframe: bool,
}

impl From<&ChunkMaterial> for ChunkMaterialKey {
    fn from(material: &ChunkMaterial) -> Self {
        Self {
            wireframe: material.wireframe,
        }
    }
}

/// Shadow and depth passes always fill, whatever the material asks for.
pub fn chunk_polygon_mode(key: ChunkMaterialKey, mesh_key: MeshPipelineKey) -> PolygonMode {
    if key.wireframe && !mesh_key.contains(MeshPipelineKey::DEPTH_PREPASS) {
        PolygonMode::Line
    } else {
        PolygonMode::Fill
    }
}

impl Default for ChunkMaterial {
    fn default() -> Self {
        Self {
            reflectance: 0.5,
            perceptual_roughness: 0.8,
            metallic: 0.0,
            wireframe: false,
        }
    }
}

impl Material for ChunkMaterial {
    fn vertex_shader() -> ShaderRef {
        CHUNK_VERTEX_SHADER.into()
    }

    fn fragment_shader() -> ShaderRef {
        CHUNK_FRAGMENT_SHADER.into()
    }

    fn prepass_vertex_shader() -> ShaderRef {
        CHUNK_PREPASS_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout
            .0
            .get_layout(&[ATTRIBUTE_VOXEL.at_shader_location(0)])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.polygon_mode = chunk_polygon_mode(key.bind_group_data, key.mesh_key);
        Ok(())
    }
}

#[derive(Resource, Clone)]
pub struct GlobalChunkMaterial(pub Handle<ChunkMaterial>);

pub fn setup_chunk_material(
    mut commands: Commands,
    mut materials: ResMut<Assets<ChunkMaterial>>,
    params: Res<crate::world::WorldSettings>,
) {
    let handle = materials.add(params.material);
    commands.insert_resource(GlobalChunkMaterial(handle));
}

/// Pushes the wireframe toggle into the shared chunk material, which
/// re-specializes every chunk pipeline.
pub fn sync_chunk_wireframe(
    settings: Res<RenderDebugSettings>,
    global: Option<Res<GlobalChunkMaterial>>,
    mut materials: ResMut<Assets<ChunkMaterial>>,
) {
    let Some(global) = global else {
        return;
    };
    if !settings.is_changed() && !global.is_added() {
        return;
    }
    let Some(material) = materials.get_mut(&global.0) else {
        return;
    };
    if material.wireframe != settings.wireframe {
        material.wireframe = settings.wireframe;
    }
}
