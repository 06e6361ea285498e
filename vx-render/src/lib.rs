//! Chunk shading stage and the Bevy plumbing that feeds it.
//!
//! [`shading`] and [`fragment`] are the CPU mirror of `shaders/chunk.wgsl`,
//! written against the collaborator traits in [`collaborators`]. The rest of the
//! crate meshes chunks into packed vertices and renders them with
//! [`material::ChunkMaterial`].

use bevy::pbr::MaterialPlugin;
use bevy::prelude::*;
use bevy::render::view::VisibilitySystems;
use tracing::debug;

mod async_mesh;
mod camera;
mod chunk;
pub mod collaborators;
mod components;
pub mod debug;
pub mod fragment;
mod input;
pub mod lighting;
pub mod material;
pub mod mesher;
mod movement;
pub mod shading;
mod world;

pub use chunk::{ChunkStore, ChunkUpdateQueue};
pub use components::{ChunkRoot, FlyCamera, SunLight};
pub use debug::RenderDebugSettings;
pub use lighting::LightingQualityPreset;
pub use material::{ATTRIBUTE_VOXEL, ChunkMaterial, GlobalChunkMaterial};
pub use movement::MovementSettings;
pub use world::WorldSettings;

#[derive(Default)]
pub struct VoxelRenderPlugin {
    pub world: WorldSettings,
    pub movement: MovementSettings,
    pub debug: RenderDebugSettings,
}

impl Plugin for VoxelRenderPlugin {
    fn build(&self, app: &mut App) {
        // Shadow maps draw chunks through the packed-vertex prepass shader.
        // The camera has no depth prepass of its own.
        app.add_plugins(MaterialPlugin::<ChunkMaterial> {
            prepass_enabled: false,
            shadows_enabled: true,
            ..default()
        })
        .insert_resource(self.world.clone())
        .insert_resource(self.movement)
        .insert_resource(self.debug.clone())
        .init_resource::<debug::RenderPerfStats>()
        .init_resource::<input::FlyInput>()
        .init_resource::<input::CursorLock>()
        .init_resource::<chunk::ChunkUpdateQueue>()
        .init_resource::<chunk::ChunkRenderState>()
        .init_resource::<chunk::ChunkStore>()
        .init_resource::<async_mesh::MeshWorker>()
        .init_resource::<async_mesh::MeshScheduler>()
        .add_systems(
            Startup,
            (
                material::setup_chunk_material,
                world::setup_lights,
                world::generate_world,
                camera::spawn_camera,
            ),
        )
        .add_systems(
            Update,
            (
                input::toggle_cursor_lock,
                input::apply_cursor_lock,
                input::collect_fly_input,
                movement::apply_fly_look,
                movement::apply_fly_movement,
                debug::handle_debug_keys,
                material::sync_chunk_wireframe,
                lighting::apply_lighting_quality,
                debug::log_render_stats,
                enqueue_chunk_meshes,
            )
                .chain(),
        )
        .add_systems(
            PostUpdate,
            apply_mesh_results.before(VisibilitySystems::CheckVisibility),
        );
    }
}

fn enqueue_chunk_meshes(
    mut queue: ResMut<chunk::ChunkUpdateQueue>,
    mut store: ResMut<chunk::ChunkStore>,
    worker: Res<async_mesh::MeshWorker>,
    mut scheduler: ResMut<async_mesh::MeshScheduler>,
    mut perf: ResMut<debug::RenderPerfStats>,
) {
    let start = std::time::Instant::now();
    for (pos, chunk) in queue.0.drain(..) {
        store.insert(pos, chunk);
        for affected in chunk::affected_chunks(pos) {
            scheduler.request(affected);
        }
    }

    if scheduler.dispatch(&store, &worker) > 0 {
        let elapsed_ms = start.elapsed().as_secs_f32() * 1000.0;
        perf.last_enqueue_ms = elapsed_ms;
        perf.avg_enqueue_ms = debug::smooth_ms(perf.avg_enqueue_ms, elapsed_ms);
    }
    perf.in_flight = scheduler.running() as u32;
}

fn apply_mesh_results(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Option<Res<GlobalChunkMaterial>>,
    mut state: ResMut<chunk::ChunkRenderState>,
    worker: Res<async_mesh::MeshWorker>,
    mut scheduler: ResMut<async_mesh::MeshScheduler>,
    mut perf: ResMut<debug::RenderPerfStats>,
) {
    let Some(material) = material else {
        return;
    };
    let start = std::time::Instant::now();
    let mut applied = 0u32;

    while let Some(result) = worker.try_recv() {
        let pos = result.chunk_pos;
        if scheduler.complete(pos) {
            // Still better than the old mesh; the rebuild goes out next frame.
            debug!(?pos, "chunk changed while meshing");
        }
        perf.last_mesh_build_ms = result.build_ms;
        perf.avg_mesh_build_ms = debug::smooth_ms(perf.avg_mesh_build_ms, result.build_ms);

        if result.mesh.is_empty() {
            if let Some(entry) = state.entries.remove(&pos) {
                commands.entity(entry.entity).despawn();
            }
            continue;
        }

        perf.total_quads += result.mesh.quad_count() as u64;
        let mesh = mesher::build_mesh(&result.mesh);

        if let Some(entry) = state.entries.get_mut(&pos) {
            if let Some(existing) = meshes.get_mut(&entry.mesh) {
                *existing = mesh;
            } else {
                let handle = meshes.add(mesh);
                commands.entity(entry.entity).insert(Mesh3d(handle.clone()));
                entry.mesh = handle;
            }
        } else {
            let handle = meshes.add(mesh);
            let entity = commands
                .spawn((
                    Mesh3d(handle.clone()),
                    MeshMaterial3d(material.0.clone()),
                    Transform::from_translation(pos.translation()),
                    chunk::chunk_aabb(),
                    ChunkRoot { pos },
                ))
                .id();
            state.entries.insert(
                pos,
                chunk::ChunkEntry {
                    entity,
                    mesh: handle,
                },
            );
        }
        applied += 1;
    }

    let elapsed_ms = start.elapsed().as_secs_f32() * 1000.0;
    perf.last_apply_ms = elapsed_ms;
    perf.avg_apply_ms = debug::smooth_ms(perf.avg_apply_ms, elapsed_ms);
    perf.last_meshes_applied = applied;
    perf.total_meshes_applied += applied;
    perf.in_flight = scheduler.running() as u32;
}
