//! Stage scene: a bounded square floor with the avatar in the middle.
//! Walking off the square leaves the stage for the lobby.

pub mod grid;

pub use grid::StageGridPlugin;

use crate::AppState;
use crate::avatar::{AvatarFactory, AvatarModelRequest, AvatarRoot, FrameStep};
use crate::scene_controller::{SceneController, SceneId, transition_to};
use crate::settings::SettingsResource;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, OnExit};

const POINT_LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);

pub struct StageScene;

impl SceneController for StageScene {
    fn register(app: &mut App) {
        app.add_message::<StageExit>()
            .init_resource::<StageExitLatch>()
            .init_resource::<LastStageExit>()
            .add_systems(OnEnter(AppState::Stage), setup_stage_scene)
            .add_systems(OnExit(AppState::Stage), cleanup_stage_scene)
            .add_systems(
                Update,
                (
                    check_stage_bounds.in_set(FrameStep::StageBounds),
                    handle_stage_exit
                        .after(FrameStep::StageBounds)
                        .run_if(in_state(AppState::Stage)),
                ),
            );
    }

    fn scene_id() -> SceneId {
        SceneId::Stage
    }
}

/// Everything spawned by the stage; despawned when the stage is left.
#[derive(Component)]
pub struct StageEntity;

/// The avatar crossed the stage border.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct StageExit {
    pub destination: String,
}

/// Armed on stage entry, disarmed by the first exit so the border
/// crossing fires once no matter how many frames the avatar stays outside.
#[derive(Resource, Debug, Default)]
pub struct StageExitLatch {
    pub armed: bool,
}

/// Destination of the most recent stage exit, shown in the lobby.
#[derive(Resource, Debug, Default)]
pub struct LastStageExit(pub Option<String>);

fn setup_stage_scene(
    mut commands: Commands,
    settings: Res<SettingsResource>,
    mut latch: ResMut<StageExitLatch>,
    mut model_requests: MessageWriter<AvatarModelRequest>,
) {
    info!("Setting up stage scene");

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
        affects_lightmapped_meshes: true,
    });
    commands.spawn((
        StageEntity,
        PointLight {
            intensity: 1_000_000.0,
            range: 40.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(POINT_LIGHT_POSITION),
    ));

    let avatar = AvatarFactory::spawn(&mut commands, Vec3::ZERO);
    commands.entity(avatar).insert(StageEntity);

    match settings.current.avatar.default_model() {
        Some(model) => {
            model_requests.write(AvatarModelRequest(model.clone()));
        }
        None => warn!("No avatar models configured; the avatar will be invisible"),
    }

    latch.armed = true;
}

fn cleanup_stage_scene(mut commands: Commands, query: Query<Entity, With<StageEntity>>) {
    info!("Cleaning up stage scene");

    for entity in &query {
        commands.entity(entity).try_despawn();
    }
}

/// One-shot border check, evaluated after the avatar and camera moved.
pub fn check_stage_bounds(
    settings: Res<SettingsResource>,
    mut latch: ResMut<StageExitLatch>,
    avatars: Query<&Transform, With<AvatarRoot>>,
    mut exits: MessageWriter<StageExit>,
) {
    if !latch.armed {
        return;
    }

    let bounds = settings.current.stage.bounds();
    let exceeded = avatars
        .iter()
        .any(|transform| bounds.exceeded(transform.translation.x, transform.translation.z));
    if !exceeded {
        return;
    }

    latch.armed = false;
    exits.write(StageExit {
        destination: settings.current.stage.exit_destination.clone(),
    });
}

pub fn handle_stage_exit(
    mut exits: MessageReader<StageExit>,
    mut last_exit: ResMut<LastStageExit>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(exit) = exits.read().last() else {
        return;
    };

    info!("Avatar left the stage, heading to {}", exit.destination);
    last_exit.0 = Some(exit.destination.clone());
    transition_to(&mut next_state, AppState::Lobby);
}
