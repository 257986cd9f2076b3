//! Stage camera: follows the avatar by replaying its per-frame step and
//! orbits around a pivot above the avatar's head on mouse drag.

use crate::AppState;
use crate::avatar::{AvatarMotion, AvatarRoot, FrameStep};
use crate::settings::{CameraSettings, SettingsResource};
use bevy::camera::{ClearColorConfig, PerspectiveProjection, Projection};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use std::f32::consts::PI;

/// Closest the orbit may get to straight up or straight down.
const MIN_POLAR_ANGLE: f32 = 0.01;

/// Pixel-unit wheel deltas are scaled to roughly one line per notch.
const PIXELS_PER_LINE: f32 = 100.0;

const STAGE_CLEAR_COLOR: Color = Color::srgb(0.05, 0.05, 0.08);

#[derive(Component)]
pub struct StageCamera;

/// Set while an overlay (the HUD) owns the pointer; orbit and dolly input is
/// discarded for those frames.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerCaptured(pub bool);

/// Orbit state of the stage camera. The pivot is re-targeted every frame;
/// the camera orientation is only changed by user orbit input.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitRig {
    pub pivot: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitRig {
    pub fn from_settings(camera: &CameraSettings) -> Self {
        Self {
            pivot: Vec3::from(camera.look_at),
            min_distance: camera.min_distance,
            max_distance: camera.max_distance,
        }
    }
}

pub struct StageCameraPlugin;

impl Plugin for StageCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerCaptured>()
            .add_systems(Startup, spawn_stage_camera)
            .add_systems(OnEnter(AppState::Stage), reset_stage_camera)
            .add_systems(
                Update,
                (
                    orbit_camera_with_mouse.in_set(FrameStep::Input),
                    follow_avatar.in_set(FrameStep::CameraFollow),
                ),
            );
    }
}

fn stage_projection(camera: &CameraSettings) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: camera.fov_degrees.to_radians(),
        near: camera.near,
        far: camera.far,
        ..default()
    })
}

pub fn spawn_stage_camera(mut commands: Commands, settings: Res<SettingsResource>) {
    let camera = &settings.current.camera;
    commands.spawn((
        StageCamera,
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(STAGE_CLEAR_COLOR),
            ..default()
        },
        stage_projection(camera),
        camera.start_transform(),
        OrbitRig::from_settings(camera),
    ));
}

pub fn reset_stage_camera(
    settings: Res<SettingsResource>,
    mut cameras: Query<(&mut Transform, &mut OrbitRig, &mut Camera), With<StageCamera>>,
) {
    let camera = &settings.current.camera;
    for (mut transform, mut rig, mut stage_camera) in &mut cameras {
        *transform = camera.start_transform();
        *rig = OrbitRig::from_settings(camera);
        stage_camera.clear_color = ClearColorConfig::Custom(STAGE_CLEAR_COLOR);
    }
}

/// Move the camera by exactly the avatar's step and re-target the pivot.
/// Runs after the avatar update so the step is this frame's.
pub fn follow_avatar(
    settings: Res<SettingsResource>,
    avatars: Query<(&Transform, &AvatarMotion), With<AvatarRoot>>,
    mut cameras: Query<(&mut Transform, &mut OrbitRig), (With<StageCamera>, Without<AvatarRoot>)>,
) {
    let Ok((avatar, motion)) = avatars.single() else {
        return;
    };
    let pivot = avatar.translation + Vec3::Y * settings.current.camera.orbit_height;

    for (mut transform, mut rig) in &mut cameras {
        if motion.delta != Vec3::ZERO {
            transform.translation += motion.delta;
        }
        rig.pivot = pivot;
    }
}

/// Rotation that orbits `offset` (camera minus pivot) by `yaw_delta` around
/// world Y and by `polar_delta` away from +Y. The polar angle is clamped so
/// the camera never passes over a pole.
pub fn orbit_rotation(offset: Vec3, yaw_delta: f32, polar_delta: f32) -> Quat {
    let yaw = Quat::from_rotation_y(yaw_delta);
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return yaw;
    }

    let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
    let target_polar = (polar + polar_delta).clamp(MIN_POLAR_ANGLE, PI - MIN_POLAR_ANGLE);
    let applied = target_polar - polar;

    // Rotating about (Y x offset) tips the offset away from +Y.
    let axis = Vec3::Y.cross(offset).normalize_or_zero();
    if axis == Vec3::ZERO || applied.abs() <= f32::EPSILON {
        return yaw;
    }
    yaw * Quat::from_axis_angle(axis, applied)
}

/// Move `offset` toward the pivot by `amount`, keeping its length within
/// `[min, max]`. A zero offset has no direction and is returned unchanged.
pub fn dolly_offset(offset: Vec3, amount: f32, min: f32, max: f32) -> Vec3 {
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return offset;
    }
    let target = (distance - amount).clamp(min, max);
    offset * (target / distance)
}

pub fn orbit_camera_with_mouse(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    pointer_captured: Res<PointerCaptured>,
    settings: Res<SettingsResource>,
    mut cameras: Query<(&mut Transform, &OrbitRig), With<StageCamera>>,
) {
    // Drain every frame so motion never piles up while the button is up.
    let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    let mut scroll_lines = 0.0;
    for wheel in mouse_wheel.read() {
        scroll_lines += match wheel.unit {
            MouseScrollUnit::Line => wheel.y,
            MouseScrollUnit::Pixel => wheel.y / PIXELS_PER_LINE,
        };
    }

    if pointer_captured.0 {
        return;
    }

    let camera = &settings.current.camera;
    let rotating = mouse_buttons.pressed(MouseButton::Left) && drag != Vec2::ZERO;
    let dollying = scroll_lines != 0.0;
    if !rotating && !dollying {
        return;
    }

    for (mut transform, rig) in &mut cameras {
        let mut offset = transform.translation - rig.pivot;

        if rotating {
            let rotation = orbit_rotation(
                offset,
                -drag.x * camera.rotate_sensitivity,
                -drag.y * camera.rotate_sensitivity,
            );
            offset = rotation * offset;
            transform.rotation = (rotation * transform.rotation).normalize();
        }
        if dollying {
            offset = dolly_offset(
                offset,
                scroll_lines * camera.dolly_step,
                rig.min_distance,
                rig.max_distance,
            );
        }

        transform.translation = rig.pivot + offset;
    }
}
