use super::types::{AvatarAnimState, AvatarRoot};
use crate::settings::{ClipSource, SettingsResource};
use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use common::Gait;
use std::time::Duration;

/// Idle and walk clips plus the graph built from them once both are loaded.
#[derive(Resource)]
pub struct AvatarAnimationLibrary {
    pub idle_clip: Handle<AnimationClip>,
    pub walk_clip: Handle<AnimationClip>,
    pub graph_handle: Option<Handle<AnimationGraph>>,
    pub idle_node: Option<AnimationNodeIndex>,
    pub walk_node: Option<AnimationNodeIndex>,
    pub initialized: bool,
}

impl AvatarAnimationLibrary {
    pub fn new(idle_clip: Handle<AnimationClip>, walk_clip: Handle<AnimationClip>) -> Self {
        Self {
            idle_clip,
            walk_clip,
            graph_handle: None,
            idle_node: None,
            walk_node: None,
            initialized: false,
        }
    }

    pub fn node_for(&self, gait: Gait) -> Option<AnimationNodeIndex> {
        match gait {
            Gait::Idle => self.idle_node,
            Gait::Walk => self.walk_node,
        }
    }
}

fn load_clip(asset_server: &AssetServer, source: &ClipSource) -> Handle<AnimationClip> {
    asset_server.load(GltfAssetLabel::Animation(source.index).from_asset(source.path.clone()))
}

pub fn setup_avatar_animation_library(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<SettingsResource>,
) {
    let avatar = &settings.current.avatar;
    commands.insert_resource(AvatarAnimationLibrary::new(
        load_clip(&asset_server, &avatar.idle_clip),
        load_clip(&asset_server, &avatar.walk_clip),
    ));
}

/// Build the two-node animation graph once both clips are available.
pub fn initialize_avatar_animation_library(
    library: Option<ResMut<AvatarAnimationLibrary>>,
    asset_server: Res<AssetServer>,
    clips: Res<Assets<AnimationClip>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    let Some(mut library) = library else {
        return;
    };
    if library.initialized {
        return;
    }

    let failed = [&library.idle_clip, &library.walk_clip]
        .into_iter()
        .any(|clip| matches!(asset_server.load_state(clip), LoadState::Failed(_)));
    if failed {
        library.initialized = true;
        warn!("Avatar animation clips failed to load; the avatar will move without animation");
        return;
    }

    if !clips.contains(&library.idle_clip) || !clips.contains(&library.walk_clip) {
        return;
    }

    let mut graph = AnimationGraph::new();
    let idle_node = graph.add_clip(library.idle_clip.clone(), 1.0, graph.root);
    let walk_node = graph.add_clip(library.walk_clip.clone(), 1.0, graph.root);

    library.graph_handle = Some(graphs.add(graph));
    library.idle_node = Some(idle_node);
    library.walk_node = Some(walk_node);
    library.initialized = true;

    info!("AvatarAnimationLibrary: idle and walk clips ready");
}

/// Marker for animation players already bound to the avatar animation graph.
#[derive(Component)]
pub struct AvatarAnimationBound;

/// Attach the shared graph to animation players that appeared under an
/// avatar and start the clip for the avatar's current gait.
pub fn bind_avatar_animation_players(
    mut commands: Commands,
    library: Option<Res<AvatarAnimationLibrary>>,
    avatars: Query<(Entity, &AvatarAnimState), With<AvatarRoot>>,
    children_query: Query<&Children>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<AvatarAnimationBound>>,
) {
    let Some(library) = library else {
        return;
    };
    let Some(graph_handle) = library.graph_handle.clone() else {
        return;
    };

    for (root_entity, anim_state) in &avatars {
        let Some(animation_node) = library.node_for(anim_state.gait) else {
            continue;
        };

        let player_entities =
            players_in_subtree(root_entity, &children_query, |entity| players.contains(entity));

        for player_entity in player_entities {
            if let Ok((entity, mut player)) = players.get_mut(player_entity) {
                let mut transitions = AnimationTransitions::new();
                transitions
                    .play(&mut player, animation_node, Duration::ZERO)
                    .repeat();

                commands.entity(entity).insert((
                    AnimationGraphHandle(graph_handle.clone()),
                    transitions,
                    AvatarAnimationBound,
                ));
            }
        }
    }
}

/// Switch bound players when the gait flips. No crossfade.
pub fn apply_avatar_animation_changes(
    library: Option<Res<AvatarAnimationLibrary>>,
    changed_avatars: Query<(Entity, &AvatarAnimState), (With<AvatarRoot>, Changed<AvatarAnimState>)>,
    children_query: Query<&Children>,
    mut players: Query<
        (&mut AnimationPlayer, &mut AnimationTransitions),
        With<AvatarAnimationBound>,
    >,
) {
    let Some(library) = library else {
        return;
    };

    for (root_entity, anim_state) in &changed_avatars {
        let Some(animation_node) = library.node_for(anim_state.gait) else {
            continue;
        };

        let player_entities =
            players_in_subtree(root_entity, &children_query, |entity| players.contains(entity));

        for player_entity in player_entities {
            if let Ok((mut player, mut transitions)) = players.get_mut(player_entity) {
                transitions
                    .play(&mut player, animation_node, Duration::ZERO)
                    .repeat();
            }
        }
    }
}

/// Entities in the avatar subtree (root included) accepted by `is_player`.
fn players_in_subtree(
    root: Entity,
    children_query: &Query<&Children>,
    is_player: impl Fn(Entity) -> bool,
) -> Vec<Entity> {
    std::iter::once(root)
        .chain(children_query.iter_descendants(root))
        .filter(|entity| is_player(*entity))
        .collect()
}
