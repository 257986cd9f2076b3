use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy_egui::EguiPlugin;

use crate::AppState;
use crate::app::plugins::{build_bevy_plugins, create_winit_settings};
use crate::avatar::AvatarPlugin;
use crate::camera::StageCameraPlugin;
use crate::lobby::LobbyScene;
use crate::scene_controller::SceneControllerPlugin;
use crate::settings::{self, GameSettings, SettingsPlugin, SettingsResource};
use crate::stage::{StageGridPlugin, StageScene};
use crate::ui::HudPlugin;

pub fn run_viewer_app() {
    let (startup_settings, path) = load_startup_settings();
    let mut app = App::new();
    configure_viewer_app(&mut app, SettingsResource::with_path(startup_settings, path));
    app.run();
}

pub fn configure_viewer_app(app: &mut App, settings: SettingsResource) {
    let startup_settings = settings.current.clone();

    app.insert_resource(settings)
        .add_plugins(build_bevy_plugins(&startup_settings))
        .insert_resource(create_winit_settings(&startup_settings))
        .add_plugins(EguiPlugin::default())
        .add_plugins(SettingsPlugin)
        .init_state::<AppState>()
        .add_plugins(StageCameraPlugin)
        .add_plugins(AvatarPlugin)
        .add_plugins(SceneControllerPlugin::<StageScene>::default())
        .add_plugins(SceneControllerPlugin::<LobbyScene>::default())
        .add_plugins(StageGridPlugin)
        .add_plugins(HudPlugin);
}

fn load_startup_settings() -> (GameSettings, std::path::PathBuf) {
    let path = settings::settings_path();
    let startup_settings = settings::load_settings_or_default(&path);
    if let Err(error) = settings::ensure_settings_file_exists(&startup_settings, &path) {
        eprintln!(
            "Failed to ensure startup settings file '{}': {}",
            path.display(),
            error
        );
    }
    (startup_settings, path)
}
