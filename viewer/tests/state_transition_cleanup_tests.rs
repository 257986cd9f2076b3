use std::time::Duration;

use bevy::input::keyboard::KeyboardFocusLost;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy::time::TimeUpdateStrategy;

use viewer::AppState;
use viewer::avatar::{AvatarModel, AvatarPlugin, AvatarRoot};
use viewer::camera::{StageCamera, StageCameraPlugin};
use viewer::lobby::LobbyScene;
use viewer::scene_controller::SceneControllerPlugin;
use viewer::settings::{GameSettings, SettingsResource};
use viewer::stage::{LastStageExit, StageEntity, StageExitLatch, StageScene};

fn viewer_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::asset::AssetPlugin::default(),
    ))
    .init_asset::<Scene>()
    .init_asset::<AnimationClip>()
    .init_asset::<AnimationGraph>()
    .init_resource::<ButtonInput<KeyCode>>()
    .init_resource::<ButtonInput<MouseButton>>()
    .add_message::<KeyboardFocusLost>()
    .add_message::<MouseMotion>()
    .add_message::<MouseWheel>()
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
    .insert_resource(SettingsResource::new(GameSettings::default()))
    .init_state::<AppState>()
    .add_plugins(StageCameraPlugin)
    .add_plugins(AvatarPlugin)
    .add_plugins(SceneControllerPlugin::<StageScene>::default())
    .add_plugins(SceneControllerPlugin::<LobbyScene>::default());

    app.update();
    app
}

fn current_state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
    let mut query = world.query_filtered::<Entity, F>();
    query.iter(world).count()
}

fn walk_forward_until_lobby(app: &mut App) -> usize {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyW);

    let mut frames = 0;
    while current_state(app) == AppState::Stage && frames < 60 {
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        frames += 1;
    }
    frames
}

#[test]
fn walking_off_the_stage_lands_in_the_lobby_and_cleans_up() {
    let mut app = viewer_app();
    assert_eq!(current_state(&app), AppState::Stage);
    assert_eq!(count::<With<StageEntity>>(app.world_mut()), 2);

    let frames = walk_forward_until_lobby(&mut app);

    // 1.5 units/s at 10 frames/s crosses z = -5 on frame 34; the state
    // switch lands one frame later.
    assert_eq!(frames, 35);
    assert_eq!(current_state(&app), AppState::Lobby);
    assert_eq!(count::<With<StageEntity>>(app.world_mut()), 0);
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 0);
    assert_eq!(count::<With<AvatarModel>>(app.world_mut()), 0);
    assert_eq!(
        app.world().resource::<LastStageExit>().0.as_deref(),
        Some("http://localhost:3000/")
    );
    assert!(!app.world().resource::<StageExitLatch>().armed);

    // The camera survives scene changes.
    assert_eq!(count::<With<StageCamera>>(app.world_mut()), 1);
}

#[test]
fn enter_returns_from_lobby_to_a_fresh_stage() {
    let mut app = viewer_app();
    walk_forward_until_lobby(&mut app);
    assert_eq!(current_state(&app), AppState::Lobby);

    {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.reset_all();
        keys.press(KeyCode::Enter);
    }
    app.update();
    app.update();

    assert_eq!(current_state(&app), AppState::Stage);
    assert!(app.world().resource::<StageExitLatch>().armed);

    let mut avatars = app
        .world_mut()
        .query_filtered::<&Transform, With<AvatarRoot>>();
    let avatar = avatars.single(app.world()).expect("avatar respawned");
    assert_eq!(avatar.translation, Vec3::ZERO);

    let mut cameras = app
        .world_mut()
        .query_filtered::<&Transform, With<StageCamera>>();
    let camera = cameras.single(app.world()).expect("one stage camera");
    assert_eq!(camera.translation, Vec3::new(0.0, 3.0, 2.0));
}
