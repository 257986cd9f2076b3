use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode, WindowResolution};
use bevy::winit::{UpdateMode, WinitSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE_PATH: &str = "./settings.yaml";

/// Overrides [`SETTINGS_FILE_PATH`] when set.
pub const SETTINGS_PATH_ENV: &str = "VIEWER_SETTINGS";

/// The grid is rebuilt every frame, so its line count is capped.
pub const MAX_GRID_DIVISIONS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    Windowed,
    Fullscreen,
}

impl Default for WindowModeSetting {
    fn default() -> Self {
        Self::Windowed
    }
}

impl WindowModeSetting {
    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    Default60,
    Monitor,
    Unlimited,
}

impl Default for FpsLimitSetting {
    fn default() -> Self {
        Self::Default60
    }
}

impl FpsLimitSetting {
    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            vsync: true,
            fps_limit: FpsLimitSetting::Default60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    /// Half-width of the walkable square. Leaving it exits the stage.
    pub half_extent: f32,
    pub grid_divisions: u32,
    /// Where the viewer says the avatar went after leaving the stage.
    pub exit_destination: String,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            half_extent: common::stage::DEFAULT_HALF_EXTENT,
            grid_divisions: 10,
            exit_destination: "http://localhost:3000/".to_string(),
        }
    }
}

impl StageSettings {
    pub fn bounds(&self) -> common::StageBounds {
        common::StageBounds::new(self.half_extent)
    }
}

/// A selectable avatar model. VRM files are glTF binaries and load through
/// the glTF loader, so they are expected under a `.glb` extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarModelEntry {
    pub name: String,
    pub path: String,
    /// VRM 0.x rigs face -Z and get a half-turn correction.
    #[serde(default)]
    pub vrm0: bool,
}

/// One animation inside a glTF file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSource {
    pub path: String,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub walk_speed: f32,
    pub models: Vec<AvatarModelEntry>,
    pub idle_clip: ClipSource,
    pub walk_clip: ClipSource,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            walk_speed: 1.5,
            models: vec![AvatarModelEntry {
                name: "Default".to_string(),
                path: "models/avatar.glb".to_string(),
                vrm0: true,
            }],
            idle_clip: ClipSource {
                path: "animations/idle.glb".to_string(),
                index: 0,
            },
            walk_clip: ClipSource {
                path: "animations/walk.glb".to_string(),
                index: 0,
            },
        }
    }
}

impl AvatarSettings {
    pub fn default_model(&self) -> Option<&AvatarModelEntry> {
        self.models.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start_position: [f32; 3],
    pub look_at: [f32; 3],
    /// Height of the orbit pivot above the avatar's feet.
    pub orbit_height: f32,
    /// Radians of orbit per pixel of mouse drag.
    pub rotate_sensitivity: f32,
    /// World units per wheel line.
    pub dolly_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            start_position: [0.0, 3.0, 2.0],
            look_at: [0.0, 0.0, 0.0],
            orbit_height: 1.0,
            rotate_sensitivity: 0.008,
            dolly_step: 0.25,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

impl CameraSettings {
    pub fn start_transform(&self) -> Transform {
        Transform::from_translation(Vec3::from(self.start_position))
            .looking_at(Vec3::from(self.look_at), Vec3::Y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameSettings {
    pub graphics: GraphicsSettings,
    pub stage: StageSettings,
    pub avatar: AvatarSettings,
    pub camera: CameraSettings,
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        let avatar = &self.avatar;
        if !(avatar.walk_speed.is_finite() && avatar.walk_speed > 0.0) {
            return Err(SettingsValidationError::WalkSpeed(avatar.walk_speed));
        }
        if avatar.models.is_empty() {
            return Err(SettingsValidationError::NoModels);
        }

        let stage = &self.stage;
        if !(stage.half_extent.is_finite() && stage.half_extent > 0.0) {
            return Err(SettingsValidationError::StageExtent(stage.half_extent));
        }
        if !(1..=MAX_GRID_DIVISIONS).contains(&stage.grid_divisions) {
            return Err(SettingsValidationError::GridDivisions(stage.grid_divisions));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(SettingsValidationError::FieldOfView(camera.fov_degrees));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(SettingsValidationError::ClipPlanes {
                near: camera.near,
                far: camera.far,
            });
        }
        if !(camera.min_distance > 0.0 && camera.min_distance <= camera.max_distance) {
            return Err(SettingsValidationError::OrbitDistance {
                min: camera.min_distance,
                max: camera.max_distance,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
    #[error("invalid settings: {0}")]
    Invalid(#[from] SettingsValidationError),
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsValidationError {
    #[error("avatar.walk_speed must be positive, got {0}")]
    WalkSpeed(f32),
    #[error("avatar.models must list at least one model")]
    NoModels,
    #[error("stage.half_extent must be positive, got {0}")]
    StageExtent(f32),
    #[error("stage.grid_divisions must be within 1..={}, got {0}", MAX_GRID_DIVISIONS)]
    GridDivisions(u32),
    #[error("camera.fov_degrees must be within (0, 180), got {0}")]
    FieldOfView(f32),
    #[error("camera clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    ClipPlanes { near: f32, far: f32 },
    #[error("camera orbit distances must satisfy 0 < min <= max, got min={min} max={max}")]
    OrbitDistance { min: f32, max: f32 },
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: GameSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: GameSettings) -> Self {
        Self::with_path(current, PathBuf::from(SETTINGS_FILE_PATH))
    }

    pub fn with_path(current: GameSettings, path: PathBuf) -> Self {
        Self { current, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_runtime_settings);
    }
}

pub fn settings_path() -> PathBuf {
    match std::env::var(SETTINGS_PATH_ENV) {
        Ok(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => PathBuf::from(SETTINGS_FILE_PATH),
    }
}

pub fn load_settings_or_default(path: &Path) -> GameSettings {
    if !path.exists() {
        return GameSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                path.display(),
                error
            );
            GameSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(
    settings: &GameSettings,
    path: &Path,
) -> Result<(), SettingsIoError> {
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) {
        PresentMode::AutoNoVsync
    } else if graphics.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

pub fn parse_settings(raw: &str) -> Result<GameSettings, SettingsIoError> {
    let settings =
        serde_yaml::from_str::<GameSettings>(raw).map_err(SettingsIoError::Deserialize)?;
    settings.validate()?;
    Ok(settings)
}

fn load_settings_from_path(path: &Path) -> Result<GameSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    parse_settings(&raw)
}

fn write_settings_to_path(settings: &GameSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn apply_runtime_settings(
    settings: Res<SettingsResource>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut winit_settings: ResMut<WinitSettings>,
    mut last_applied: Local<Option<GraphicsSettings>>,
) {
    let graphics = &settings.current.graphics;
    if last_applied.as_ref() == Some(graphics) {
        return;
    }

    if let Ok(mut window) = windows.single_mut() {
        let target_mode = graphics.window_mode.to_bevy();
        window.mode = target_mode;

        // In borderless fullscreen, forcing a custom logical resolution can
        // produce a top-left viewport offset. Keep monitor/native size there.
        if matches!(target_mode, WindowMode::Windowed) {
            window.resolution =
                WindowResolution::new(graphics.resolution.width, graphics.resolution.height);
        }

        window.present_mode = present_mode_for(graphics);
    }

    let update_mode = graphics.fps_limit.to_update_mode();
    winit_settings.focused_mode = update_mode;
    winit_settings.unfocused_mode = update_mode;

    *last_applied = Some(graphics.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = GameSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.avatar.walk_speed, 1.5);
        assert_eq!(settings.stage.half_extent, 5.0);
        assert_eq!(settings.camera.start_position, [0.0, 3.0, 2.0]);
        assert_eq!(settings.camera.orbit_height, 1.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_sections() {
        let settings = parse_settings(
            "stage:\n  half_extent: 8.0\navatar:\n  walk_speed: 2.0\n",
        )
        .expect("partial settings should parse");

        assert_eq!(settings.stage.half_extent, 8.0);
        assert_eq!(settings.stage.grid_divisions, 10);
        assert_eq!(settings.avatar.walk_speed, 2.0);
        assert_eq!(settings.avatar.models.len(), 1);
        assert_eq!(settings.camera, CameraSettings::default());
    }

    #[test]
    fn model_entries_default_to_vrm1() {
        let settings = parse_settings(
            "avatar:\n  models:\n    - name: Alice\n      path: models/alice.glb\n",
        )
        .expect("model list should parse");

        let model = settings.avatar.default_model().expect("one model");
        assert_eq!(model.name, "Alice");
        assert!(!model.vrm0);
    }

    #[test]
    fn yaml_written_by_the_viewer_reads_back() {
        let mut settings = GameSettings::default();
        settings.stage.exit_destination = "https://example.org/plaza".to_string();
        let encoded = serde_yaml::to_string(&settings).expect("encode");
        assert_eq!(parse_settings(&encoded).expect("decode"), settings);
    }

    #[test]
    fn rejects_non_positive_walk_speed() {
        let result = parse_settings("avatar:\n  walk_speed: 0.0\n");
        assert!(matches!(
            result,
            Err(SettingsIoError::Invalid(SettingsValidationError::WalkSpeed(_)))
        ));
    }

    #[test]
    fn rejects_empty_model_list() {
        let result = parse_settings("avatar:\n  models: []\n");
        assert!(matches!(
            result,
            Err(SettingsIoError::Invalid(SettingsValidationError::NoModels))
        ));
    }

    #[test]
    fn rejects_inverted_camera_limits() {
        let mut settings = GameSettings::default();
        settings.camera.near = 10.0;
        settings.camera.far = 1.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsValidationError::ClipPlanes { .. })
        ));

        let mut settings = GameSettings::default();
        settings.camera.min_distance = 5.0;
        settings.camera.max_distance = 1.0;
        assert!(matches!(
            settings.validate(),
            Err(SettingsValidationError::OrbitDistance { .. })
        ));
    }

    #[test]
    fn rejects_degenerate_stage() {
        let mut settings = GameSettings::default();
        settings.stage.half_extent = -1.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::StageExtent(-1.0))
        );

        let mut settings = GameSettings::default();
        settings.stage.grid_divisions = 0;
        assert_eq!(
            settings.validate(),
            Err(SettingsValidationError::GridDivisions(0))
        );
    }

    #[test]
    fn rejects_oversized_grid() {
        let result = parse_settings("stage:\n  grid_divisions: 4000000000\n");
        assert!(matches!(
            result,
            Err(SettingsIoError::Invalid(SettingsValidationError::GridDivisions(4_000_000_000)))
        ));

        let mut settings = GameSettings::default();
        settings.stage.grid_divisions = MAX_GRID_DIVISIONS;
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("./definitely-missing-viewer-settings.yaml");
        assert_eq!(load_settings_or_default(path), GameSettings::default());
    }
}
