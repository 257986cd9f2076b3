pub mod animation;
pub mod factory;
pub mod input;
pub mod model;
pub mod movement;
pub mod types;

pub use animation::{
    AvatarAnimationBound, AvatarAnimationLibrary, apply_avatar_animation_changes,
    bind_avatar_animation_players, initialize_avatar_animation_library,
    setup_avatar_animation_library,
};
pub use factory::AvatarFactory;
pub use input::read_movement_input;
pub use model::{AvatarModelRequest, apply_avatar_model_requests, disable_avatar_frustum_culling};
pub use movement::advance_avatar_movement;
pub use types::{AvatarAnimState, AvatarController, AvatarModel, AvatarMotion, AvatarRoot};

use crate::AppState;
use bevy::prelude::*;

/// Per-frame ordering on the stage: input, then the avatar step, then the
/// camera replaying that step, then the boundary check.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameStep {
    Input,
    Movement,
    CameraFollow,
    StageBounds,
}

pub struct AvatarPlugin;

impl Plugin for AvatarPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AvatarModelRequest>()
            .configure_sets(
                Update,
                (
                    FrameStep::Input,
                    FrameStep::Movement,
                    FrameStep::CameraFollow,
                    FrameStep::StageBounds,
                )
                    .chain()
                    .run_if(in_state(AppState::Stage)),
            )
            .add_systems(Startup, setup_avatar_animation_library)
            .add_systems(
                Update,
                (
                    read_movement_input.in_set(FrameStep::Input),
                    advance_avatar_movement.in_set(FrameStep::Movement),
                ),
            )
            .add_systems(
                Update,
                (
                    apply_avatar_model_requests,
                    disable_avatar_frustum_culling,
                    initialize_avatar_animation_library,
                    bind_avatar_animation_players,
                    apply_avatar_animation_changes,
                )
                    .chain()
                    .after(FrameStep::Input),
            );
    }
}
