use super::types::{AvatarAnimState, AvatarController, AvatarMotion, AvatarRoot};
use bevy::prelude::*;

pub struct AvatarFactory;

impl AvatarFactory {
    /// Spawn an idle avatar root. The model arrives later through an
    /// [`AvatarModelRequest`](super::model::AvatarModelRequest).
    pub fn spawn(commands: &mut Commands, position: Vec3) -> Entity {
        commands
            .spawn((
                AvatarRoot,
                AvatarController::default(),
                AvatarMotion::default(),
                AvatarAnimState::default(),
                Transform::from_translation(position),
                Visibility::default(),
            ))
            .id()
    }
}
