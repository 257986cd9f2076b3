/// Keys that move the avatar.
///
/// Directions are expressed in character-local space as `(x, z)` and are
/// rotated into world space by the camera's yaw, see [`crate::heading::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    /// Away from the camera (`W` / arrow up)
    Forward,
    /// Strafe left (`A` / arrow left)
    Left,
    /// Strafe right (`D` / arrow right)
    Right,
    /// Toward the camera (`S` / arrow down)
    Backward,
}

impl MoveKey {
    /// Order in which simultaneous presses are applied within one frame.
    /// The last applied press wins.
    pub const ALL: [MoveKey; 4] = [
        MoveKey::Forward,
        MoveKey::Left,
        MoveKey::Right,
        MoveKey::Backward,
    ];

    /// Unit vector `(x, z)` in character-local space.
    pub fn direction(&self) -> (f32, f32) {
        match self {
            MoveKey::Forward => (0.0, 1.0),
            MoveKey::Left => (1.0, 0.0),
            MoveKey::Right => (-1.0, 0.0),
            MoveKey::Backward => (0.0, -1.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoveKey::Forward => "Forward",
            MoveKey::Left => "Left",
            MoveKey::Right => "Right",
            MoveKey::Backward => "Backward",
        }
    }
}

/// Animation/locomotion state. Switching is immediate, there is no blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gait {
    #[default]
    Idle,
    Walk,
}

impl Gait {
    pub fn name(&self) -> &'static str {
        match self {
            Gait::Idle => "Idle",
            Gait::Walk => "Walk",
        }
    }
}

/// Result of feeding one key edge into [`LocomotionIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitChange {
    Unchanged,
    Changed { from: Gait, to: Gait },
}

impl GaitChange {
    fn between(from: Gait, to: Gait) -> Self {
        if from == to {
            GaitChange::Unchanged
        } else {
            GaitChange::Changed { from, to }
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, GaitChange::Changed { .. })
    }
}

/// What the player currently asks the avatar to do.
///
/// Driven purely by key-down/key-up edges. Velocity never feeds back into
/// the gait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionIntent {
    gait: Gait,
    direction: (f32, f32),
}

impl Default for LocomotionIntent {
    fn default() -> Self {
        Self {
            gait: Gait::Idle,
            direction: MoveKey::Forward.direction(),
        }
    }
}

impl LocomotionIntent {
    pub fn gait(&self) -> Gait {
        self.gait
    }

    /// Local-space direction of the most recent key press.
    pub fn direction(&self) -> (f32, f32) {
        self.direction
    }

    pub fn key_down(&mut self, key: MoveKey) -> GaitChange {
        let previous = self.gait;
        self.direction = key.direction();
        self.gait = Gait::Walk;
        GaitChange::between(previous, self.gait)
    }

    /// Releasing any movement key stops the avatar, even if another
    /// movement key is still held.
    pub fn key_up(&mut self, _key: MoveKey) -> GaitChange {
        self.release_all()
    }

    pub fn release_all(&mut self) -> GaitChange {
        let previous = self.gait;
        self.gait = Gait::Idle;
        GaitChange::between(previous, self.gait)
    }

    /// Ground speed for the current gait. Exactly zero while idle.
    pub fn speed(&self, walk_speed: f32) -> f32 {
        match self.gait {
            Gait::Walk => walk_speed,
            Gait::Idle => 0.0,
        }
    }
}
