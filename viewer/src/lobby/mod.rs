//! Lobby scene: where the avatar lands after walking off the stage.
//! Gray background only; the HUD draws the way back.

use crate::AppState;
use crate::scene_controller::{SceneController, SceneId, transition_to};
use crate::stage::LastStageExit;
use bevy::camera::ClearColorConfig;
use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};

const LOBBY_BACKGROUND: Color = Color::srgb(0.42, 0.42, 0.42);

pub struct LobbyScene;

impl SceneController for LobbyScene {
    fn register(app: &mut App) {
        app.add_systems(OnEnter(AppState::Lobby), setup_lobby_scene)
            .add_systems(OnExit(AppState::Lobby), cleanup_lobby_scene)
            .add_systems(
                Update,
                return_to_stage_with_enter_key.run_if(in_state(AppState::Lobby)),
            );
    }

    fn scene_id() -> SceneId {
        SceneId::Lobby
    }
}

#[derive(Component)]
struct LobbySceneRoot;

fn setup_lobby_scene(
    mut commands: Commands,
    last_exit: Option<Res<LastStageExit>>,
    mut camera_query: Query<&mut Camera, With<Camera3d>>,
) {
    match last_exit.as_ref().and_then(|exit| exit.0.as_deref()) {
        Some(destination) => info!("Setting up lobby scene (arrived from stage, exit {destination})"),
        None => info!("Setting up lobby scene"),
    }

    for mut camera in &mut camera_query {
        camera.clear_color = ClearColorConfig::Custom(LOBBY_BACKGROUND);
    }

    commands.spawn((LobbySceneRoot, Transform::default(), Visibility::Visible));
}

fn cleanup_lobby_scene(mut commands: Commands, query: Query<Entity, With<LobbySceneRoot>>) {
    info!("Cleaning up lobby scene");

    for entity in &query {
        commands.entity(entity).try_despawn();
    }
}

fn return_to_stage_with_enter_key(
    keys: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Enter) || keys.just_pressed(KeyCode::NumpadEnter) {
        transition_to(&mut next_state, AppState::Stage);
    }
}
