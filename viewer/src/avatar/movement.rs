use super::types::{AvatarController, AvatarMotion, AvatarRoot};
use crate::camera::StageCamera;
use crate::settings::SettingsResource;
use bevy::prelude::*;

/// Integrate the avatar's walk for this frame.
///
/// The heading is measured from the camera toward the avatar, so "forward"
/// always means away from the viewer. The yaw only changes while moving;
/// idle frames keep the last facing.
pub fn advance_avatar_movement(
    time: Res<Time>,
    settings: Res<SettingsResource>,
    cameras: Query<&Transform, (With<StageCamera>, Without<AvatarRoot>)>,
    mut avatars: Query<
        (&mut Transform, &mut AvatarController, &mut AvatarMotion),
        With<AvatarRoot>,
    >,
) {
    let Ok(camera) = cameras.single() else {
        for (_, _, mut motion) in &mut avatars {
            motion.delta = Vec3::ZERO;
        }
        return;
    };

    let dt = time.delta_secs();
    let walk_speed = settings.current.avatar.walk_speed;

    for (mut transform, mut controller, mut motion) in &mut avatars {
        let speed = controller.intent.speed(walk_speed);
        let front_yaw = common::yaw_toward(
            (camera.translation.x, camera.translation.z),
            (transform.translation.x, transform.translation.z),
        );
        let step = common::step(speed, controller.intent.direction(), front_yaw, dt);

        motion.delta = Vec3::new(step.dx, 0.0, step.dz);
        if speed > 0.0 {
            controller.heading = step.heading;
            transform.rotation = Quat::from_rotation_y(step.heading);
        }
        if motion.delta != Vec3::ZERO {
            transform.translation += motion.delta;
        }
    }
}
