use crate::AppState;
use crate::avatar::{
    AvatarAnimState, AvatarController, AvatarModel, AvatarModelRequest, AvatarRoot, FrameStep,
};
use crate::camera::PointerCaptured;
use crate::scene_controller::transition_to;
use crate::settings::SettingsResource;
use crate::stage::LastStageExit;
use bevy::prelude::*;
use bevy_egui::input::EguiWantsInput;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudUiState>()
            .add_systems(
                Update,
                (
                    toggle_hud_with_f1,
                    sync_pointer_capture.before(FrameStep::Input),
                ),
            )
            .add_systems(EguiPrimaryContextPass, draw_hud_egui);
    }
}

#[derive(Resource)]
struct HudUiState {
    visible: bool,
}

impl Default for HudUiState {
    fn default() -> Self {
        Self { visible: true }
    }
}

fn toggle_hud_with_f1(keys: Res<ButtonInput<KeyCode>>, mut hud_state: ResMut<HudUiState>) {
    if keys.just_pressed(KeyCode::F1) {
        hud_state.visible = !hud_state.visible;
    }
}

fn sync_pointer_capture(
    egui_wants_input: Res<EguiWantsInput>,
    mut pointer_captured: ResMut<PointerCaptured>,
) {
    pointer_captured.set_if_neq(PointerCaptured(egui_wants_input.wants_any_pointer_input()));
}

/// Heading shown in the HUD, in whole degrees within `(-180, 180]`.
pub fn heading_degrees(heading: f32) -> i32 {
    let degrees = common::wrap_angle(heading).to_degrees().round() as i32;
    if degrees == -180 { 180 } else { degrees }
}

fn draw_hud_egui(
    mut contexts: EguiContexts,
    hud_state: Res<HudUiState>,
    settings: Res<SettingsResource>,
    app_state: Res<State<AppState>>,
    last_exit: Res<LastStageExit>,
    avatars: Query<(&Transform, &AvatarController, &AvatarAnimState), With<AvatarRoot>>,
    models: Query<&AvatarModel>,
    mut model_requests: MessageWriter<AvatarModelRequest>,
    mut next_state: ResMut<NextState<AppState>>,
    mut theme_initialized: Local<bool>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if !*theme_initialized {
        apply_hud_theme(ctx);
        *theme_initialized = true;
    }

    match app_state.get() {
        AppState::Stage => {
            if !hud_state.visible {
                return;
            }
            let active_model = models.iter().next().map(|model| model.path.as_str());
            draw_avatar_window(
                ctx,
                &settings,
                avatars.single().ok(),
                active_model,
                &mut model_requests,
            );
        }
        AppState::Lobby => draw_lobby_window(ctx, &last_exit, &mut next_state),
    }
}

fn apply_hud_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.visuals.window_corner_radius = egui::CornerRadius::same(10);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);
    ctx.set_style(style);
}

fn draw_avatar_window(
    ctx: &egui::Context,
    settings: &SettingsResource,
    avatar: Option<(&Transform, &AvatarController, &AvatarAnimState)>,
    active_model: Option<&str>,
    model_requests: &mut MessageWriter<AvatarModelRequest>,
) {
    egui::Window::new("Avatar")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            match avatar {
                Some((transform, controller, anim_state)) => {
                    let position = transform.translation;
                    ui.label(format!(
                        "Position: {:.2}, {:.2}, {:.2}",
                        position.x, position.y, position.z
                    ));
                    ui.label(format!(
                        "Heading: {} deg",
                        heading_degrees(controller.heading)
                    ));
                    ui.label(format!("Gait: {}", anim_state.gait.name()));
                }
                None => {
                    ui.label("No avatar on stage");
                }
            }

            ui.separator();
            ui.label("Model");
            ui.horizontal_wrapped(|ui| {
                for entry in &settings.current.avatar.models {
                    let selected = active_model == Some(entry.path.as_str());
                    if ui.selectable_label(selected, &entry.name).clicked() && !selected {
                        model_requests.write(AvatarModelRequest(entry.clone()));
                    }
                }
            });

            ui.separator();
            ui.small(format!("Settings: {}", settings.path().display()));
            ui.small("WASD / arrows to walk, drag to orbit, F1 hides this window");
        });
}

fn draw_lobby_window(
    ctx: &egui::Context,
    last_exit: &LastStageExit,
    next_state: &mut NextState<AppState>,
) {
    egui::Window::new("Lobby")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            match last_exit.0.as_deref() {
                Some(destination) => {
                    ui.label(format!("You left the stage towards {destination}"));
                }
                None => {
                    ui.label("You are in the lobby");
                }
            }
            ui.add_space(6.0);
            if ui
                .add_sized(egui::vec2(220.0, 30.0), egui::Button::new("Return to stage"))
                .clicked()
            {
                transition_to(next_state, AppState::Stage);
            }
            ui.small("or press Enter");
        });
}
