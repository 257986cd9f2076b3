use bevy::prelude::*;
use common::{Gait, LocomotionIntent};

// ============================================================================
// AVATAR COMPONENTS
// ============================================================================

/// Marker for the avatar root entity. The root owns the world transform;
/// models are swapped underneath it.
#[derive(Component)]
pub struct AvatarRoot;

/// The currently displayed model scene, child of [`AvatarRoot`].
#[derive(Component, Debug, Clone)]
pub struct AvatarModel {
    pub name: String,
    pub path: String,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AvatarController {
    pub intent: LocomotionIntent,
    /// World yaw of the last non-empty step, in `(-PI, PI]`.
    pub heading: f32,
}

/// World-space translation applied to the avatar this frame.
/// The camera rig replays it so both move in lockstep.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AvatarMotion {
    pub delta: Vec3,
}

/// Which clip the avatar's animation players should be running.
/// Only written on gait edges so `Changed` means a real switch.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvatarAnimState {
    pub gait: Gait,
}
