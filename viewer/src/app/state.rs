#[derive(bevy::prelude::States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The avatar walks on the bounded stage.
    #[default]
    Stage,
    /// Landing state after the avatar walks off the stage.
    Lobby,
}
