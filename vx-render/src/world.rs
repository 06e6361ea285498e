use bevy::prelude::*;
use tracing::info;
use vx_utils::{ChunkPos, Terrain, TerrainSettings};

use crate::chunk::ChunkUpdateQueue;
use crate::components::SunLight;
use crate::material::ChunkMaterial;

#[derive(Resource, Debug, Clone)]
pub struct WorldSettings {
    pub terrain: TerrainSettings,
    /// Chunks generated around the origin on each horizontal axis.
    pub radius_chunks: i32,
    /// Vertical chunk layers, from `min_chunk_y` upwards.
    pub min_chunk_y: i32,
    pub max_chunk_y: i32,
    pub material: ChunkMaterial,
    pub camera_start: Vec3,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings::default(),
            radius_chunks: 4,
            min_chunk_y: -2,
            max_chunk_y: 1,
            material: ChunkMaterial::default(),
            camera_start: Vec3::new(0.0, 80.0, 96.0),
        }
    }
}

impl WorldSettings {
    pub fn chunk_positions(&self) -> Vec<ChunkPos> {
        let r = self.radius_chunks.max(0);
        let mut positions = Vec::new();
        for y in self.min_chunk_y..=self.max_chunk_y {
            for z in -r..=r {
                for x in -r..=r {
                    positions.push(ChunkPos::new(x, y, z));
                }
            }
        }
        positions
    }
}

pub fn generate_world(settings: Res<WorldSettings>, mut queue: ResMut<ChunkUpdateQueue>) {
    let terrain = Terrain::new(settings.terrain);
    for pos in settings.chunk_positions() {
        let chunk = terrain.generate_chunk(pos);
        if chunk.is_empty() {
            continue;
        }
        queue.0.push((pos, chunk));
    }
    info!(
        chunks = queue.0.len(),
        seed = settings.terrain.seed,
        "generated terrain"
    );
}

pub fn setup_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 7_000.0,
            ..default()
        },
        SunLight,
        Transform::from_xyz(30.0, 86.0, 42.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.45, 0.45, 0.5),
        brightness: 150.0,
        affects_lightmapped_meshes: true,
    });
}
