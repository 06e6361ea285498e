use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

/// Keys held for each camera-space movement direction. +Z is forward.
const MOVE_BINDINGS: [(&[KeyCode], Vec3); 6] = [
    (&[KeyCode::KeyW, KeyCode::ArrowUp], Vec3::Z),
    (&[KeyCode::KeyS, KeyCode::ArrowDown], Vec3::NEG_Z),
    (&[KeyCode::KeyD, KeyCode::ArrowRight], Vec3::X),
    (&[KeyCode::KeyA, KeyCode::ArrowLeft], Vec3::NEG_X),
    (&[KeyCode::Space, KeyCode::KeyE], Vec3::Y),
    (&[KeyCode::ControlLeft, KeyCode::ControlRight, KeyCode::KeyQ], Vec3::NEG_Y),
];

const BOOST_KEYS: [KeyCode; 2] = [KeyCode::ShiftLeft, KeyCode::ShiftRight];

/// Fly-camera intent gathered once per frame.
#[derive(Resource, Default, Debug, PartialEq)]
pub struct FlyInput {
    pub move_axis: Vec3,
    pub look_delta: Vec2,
    pub wants_boost: bool,
}

/// Whether the camera owns the mouse. Escape releases it, a left click takes it back.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorLock(pub bool);

impl Default for CursorLock {
    fn default() -> Self {
        Self(true)
    }
}

impl CursorLock {
    fn grab_mode(self) -> CursorGrabMode {
        if self.0 {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        }
    }
}

pub fn move_axis(keys: &ButtonInput<KeyCode>) -> Vec3 {
    MOVE_BINDINGS
        .iter()
        .filter(|(bound, _)| keys.any_pressed(bound.iter().copied()))
        .map(|(_, dir)| *dir)
        .sum()
}

pub fn collect_fly_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut motion_events: EventReader<MouseMotion>,
    mut input: ResMut<FlyInput>,
    lock: Res<CursorLock>,
) {
    if !lock.0 {
        motion_events.clear();
        input.set_if_neq(FlyInput::default());
        return;
    }

    input.look_delta = motion_events.read().map(|ev| ev.delta).sum();
    input.move_axis = move_axis(&keys);
    input.wants_boost = keys.any_pressed(BOOST_KEYS);
}

pub fn toggle_cursor_lock(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut lock: ResMut<CursorLock>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        lock.0 = !lock.0;
    } else if !lock.0 && mouse.just_pressed(MouseButton::Left) {
        lock.0 = true;
    }
}

pub fn apply_cursor_lock(
    lock: Res<CursorLock>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !lock.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    window.cursor_options.grab_mode = lock.grab_mode();
    window.cursor_options.visible = !lock.0;
}
