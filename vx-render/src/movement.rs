use bevy::prelude::*;
use serde::Deserialize;

use crate::components::{FlyCamera, LookAngles};
use crate::input::FlyInput;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub speed: f32,
    pub boost_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 12.0,
            boost_speed: 256.0,
            mouse_sensitivity: 0.0015,
        }
    }
}

pub fn apply_fly_look(
    settings: Res<MovementSettings>,
    input: Res<FlyInput>,
    mut query: Query<(&mut Transform, &mut LookAngles), With<FlyCamera>>,
) {
    if input.look_delta == Vec2::ZERO {
        return;
    }
    let Some((mut transform, mut look)) = query.iter_mut().next() else {
        return;
    };

    look.yaw -= input.look_delta.x * settings.mouse_sensitivity;
    look.pitch -= input.look_delta.y * settings.mouse_sensitivity;
    look.pitch = look.pitch.clamp(-1.54, 1.54);

    transform.rotation = Quat::from_euler(EulerRot::YXZ, look.yaw, look.pitch, 0.0);
}

pub fn apply_fly_movement(
    time: Res<Time>,
    settings: Res<MovementSettings>,
    input: Res<FlyInput>,
    mut query: Query<&mut Transform, With<FlyCamera>>,
) {
    let Some(mut transform) = query.iter_mut().next() else {
        return;
    };

    let right = transform.right();
    let forward = transform.forward();
    let mut direction =
        right * input.move_axis.x + forward * input.move_axis.z + Vec3::Y * input.move_axis.y;

    if direction.length_squared() > 0.0 {
        direction = direction.normalize();
    }

    let speed = if input.wants_boost {
        settings.boost_speed
    } else {
        settings.speed
    };

    transform.translation += direction * speed * time.delta_secs();
}
