use bevy::prelude::*;
use vx_utils::ChunkPos;

#[derive(Component)]
pub struct FlyCamera;

#[derive(Component, Default)]
pub struct LookAngles {
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Component)]
pub struct ChunkRoot {
    pub pos: ChunkPos,
}

#[derive(Component)]
pub struct SunLight;
