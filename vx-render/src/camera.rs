use bevy::prelude::*;

use crate::components::{FlyCamera, LookAngles};
use crate::world::WorldSettings;

pub fn spawn_camera(mut commands: Commands, settings: Res<WorldSettings>) {
    let start = settings.camera_start;
    let transform = Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y);
    let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);

    commands.spawn((
        Camera3d::default(),
        FlyCamera,
        LookAngles { yaw, pitch },
        transform,
    ));
}
