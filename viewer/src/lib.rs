#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod app;
pub mod avatar;
pub mod camera;
pub mod lobby;
pub mod scene_controller;
pub mod settings;
pub mod stage;
pub mod ui;

pub use app::state::AppState;
