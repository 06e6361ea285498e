use bevy::prelude::*;

use crate::lighting::LightingQualityPreset;

#[derive(Resource, Debug, Clone)]
pub struct RenderDebugSettings {
    pub shadows_enabled: bool,
    pub wireframe: bool,
    pub lighting_quality: LightingQualityPreset,
}

impl Default for RenderDebugSettings {
    fn default() -> Self {
        Self {
            shadows_enabled: true,
            wireframe: false,
            lighting_quality: LightingQualityPreset::default(),
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct RenderPerfStats {
    pub last_enqueue_ms: f32,
    pub avg_enqueue_ms: f32,
    pub last_apply_ms: f32,
    pub avg_apply_ms: f32,
    pub last_mesh_build_ms: f32,
    pub avg_mesh_build_ms: f32,
    pub last_meshes_applied: u32,
    pub total_meshes_applied: u32,
    pub total_quads: u64,
    pub in_flight: u32,
}

/// Exponential moving average seeded with the first sample.
pub fn smooth_ms(avg: f32, sample: f32) -> f32 {
    if avg == 0.0 {
        sample
    } else {
        avg * 0.9 + sample * 0.1
    }
}

pub fn handle_debug_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<RenderDebugSettings>,
) {
    if keys.just_pressed(KeyCode::F3) {
        settings.wireframe = !settings.wireframe;
        info!(wireframe = settings.wireframe, "toggled wireframe");
    }
    if keys.just_pressed(KeyCode::F4) {
        settings.shadows_enabled = !settings.shadows_enabled;
        info!(shadows = settings.shadows_enabled, "toggled shadows");
    }
    if keys.just_pressed(KeyCode::F5) {
        settings.lighting_quality = settings.lighting_quality.next();
        info!(preset = settings.lighting_quality.label(), "lighting preset");
    }
}

pub fn log_render_stats(
    time: Res<Time>,
    mut timer: Local<Option<Timer>>,
    stats: Res<RenderPerfStats>,
) {
    let timer = timer.get_or_insert_with(|| Timer::from_seconds(5.0, TimerMode::Repeating));
    if !timer.tick(time.delta()).just_finished() {
        return;
    }
    debug!(
        meshes = stats.total_meshes_applied,
        quads = stats.total_quads,
        in_flight = stats.in_flight,
        avg_build_ms = stats.avg_mesh_build_ms,
        avg_apply_ms = stats.avg_apply_ms,
        avg_enqueue_ms = stats.avg_enqueue_ms,
        "chunk render stats"
    );
}
