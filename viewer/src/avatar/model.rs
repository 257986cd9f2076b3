use super::types::{AvatarModel, AvatarRoot};
use crate::settings::AvatarModelEntry;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use std::f32::consts::PI;

/// Ask for the avatar to display a different model.
#[derive(Message, Debug, Clone)]
pub struct AvatarModelRequest(pub AvatarModelEntry);

/// Yaw applied to the model node so every rig faces the root's +Z.
pub fn model_yaw_correction(entry: &AvatarModelEntry) -> f32 {
    if entry.vrm0 { PI } else { 0.0 }
}

/// Replace the avatar's model scene. The root keeps its transform and
/// controller state, so swapping mid-walk is seamless. Only the last
/// request of a frame is honoured.
pub fn apply_avatar_model_requests(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut requests: MessageReader<AvatarModelRequest>,
    roots: Query<Entity, With<AvatarRoot>>,
    models: Query<(Entity, &AvatarModel)>,
) {
    let Some(AvatarModelRequest(entry)) = requests.read().last() else {
        return;
    };

    let Ok(root) = roots.single() else {
        warn!("Ignoring model request '{}': no avatar on stage", entry.name);
        return;
    };

    if models.iter().any(|(_, model)| model.path == entry.path) {
        return;
    }

    for (entity, model) in &models {
        info!("Disposing avatar model '{}'", model.name);
        commands.entity(entity).try_despawn();
    }

    let scene: Handle<Scene> =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(entry.path.clone()));
    let model = commands
        .spawn((
            AvatarModel {
                name: entry.name.clone(),
                path: entry.path.clone(),
            },
            SceneRoot(scene),
            Transform::from_rotation(Quat::from_rotation_y(model_yaw_correction(entry))),
        ))
        .id();
    commands.entity(root).add_child(model);

    info!("Avatar model '{}' loading from {}", entry.name, entry.path);
}

/// Skinned meshes animate outside their bind-pose bounds, so meshes under
/// an avatar model are never frustum culled.
pub fn disable_avatar_frustum_culling(
    mut commands: Commands,
    new_meshes: Query<Entity, (Added<Mesh3d>, Without<NoFrustumCulling>)>,
    parents: Query<&ChildOf>,
    models: Query<(), With<AvatarModel>>,
) {
    for mesh in &new_meshes {
        let mut current = mesh;
        while let Ok(child_of) = parents.get(current) {
            current = child_of.parent();
            if models.contains(current) {
                commands.entity(mesh).insert(NoFrustumCulling);
                break;
            }
        }
    }
}
