use super::types::{AvatarAnimState, AvatarController, AvatarRoot};
use bevy::input::keyboard::KeyboardFocusLost;
use bevy::prelude::*;
use common::{LocomotionIntent, MoveKey};

/// Physical keys bound to each movement key.
pub fn key_codes(key: MoveKey) -> [KeyCode; 2] {
    match key {
        MoveKey::Forward => [KeyCode::KeyW, KeyCode::ArrowUp],
        MoveKey::Left => [KeyCode::KeyA, KeyCode::ArrowLeft],
        MoveKey::Right => [KeyCode::KeyD, KeyCode::ArrowRight],
        MoveKey::Backward => [KeyCode::KeyS, KeyCode::ArrowDown],
    }
}

/// Apply this frame's key edges to an intent.
///
/// Releases go first, then presses in [`MoveKey::ALL`] order. A key that
/// went down and back up within the same frame counts as a press followed
/// by a release.
pub fn apply_key_edges(intent: &mut LocomotionIntent, keys: &ButtonInput<KeyCode>) {
    let just_pressed = |key: MoveKey| key_codes(key).iter().any(|code| keys.just_pressed(*code));
    let just_released =
        |key: MoveKey| key_codes(key).iter().any(|code| keys.just_released(*code));
    let held = |key: MoveKey| key_codes(key).iter().any(|code| keys.pressed(*code));

    for key in MoveKey::ALL {
        if just_released(key) && !just_pressed(key) {
            intent.key_up(key);
        }
    }
    for key in MoveKey::ALL {
        if just_pressed(key) {
            intent.key_down(key);
        }
    }
    for key in MoveKey::ALL {
        if just_pressed(key) && just_released(key) && !held(key) {
            intent.key_up(key);
        }
    }
}

/// Translate keyboard edges into locomotion intent and gait changes.
pub fn read_movement_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut focus_lost: MessageReader<KeyboardFocusLost>,
    mut avatars: Query<(&mut AvatarController, &mut AvatarAnimState), With<AvatarRoot>>,
) {
    // The input plugin also moves held keys to just-released on focus
    // loss; releasing here covers keys it never saw go down.
    let lost_focus = focus_lost.read().count() > 0;

    for (mut controller, mut anim_state) in &mut avatars {
        let mut intent = controller.intent;
        if lost_focus {
            intent.release_all();
        }
        apply_key_edges(&mut intent, &keys);

        if controller.intent != intent {
            controller.intent = intent;
        }
        if anim_state.gait != intent.gait() {
            debug!("Avatar gait -> {}", intent.gait().name());
            anim_state.gait = intent.gait();
        }
    }
}
