use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::With,
    system::{Commands, Query, ResMut},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::{
    constants::mechanics::FEAR_DURATION,
    events::ScoreEvent,
    map::builder::Maze,
    systems::{
        collision::intersects_pickup,
        components::{Collider, EntityType, FruitMode, ItemCollider, PickupCount, PlayerControlled, Position, SpawnOrder},
        ghost::{GhostMode, GhostState},
        notify::ChangeSet,
    },
};

/// Collects every coin and fruit the player overlaps, in creation order.
///
/// A fruit frightens every active ghost and starts fruit mode.
#[allow(clippy::too_many_arguments)]
#[allow(clippy::type_complexity)]
pub fn item_system(
    mut commands: Commands,
    mut maze: ResMut<Maze>,
    mut counts: ResMut<PickupCount>,
    mut fruit_mode: ResMut<FruitMode>,
    mut changes: ResMut<ChangeSet>,
    mut events: EventWriter<ScoreEvent>,
    players: Query<(&Position, &Collider), With<PlayerControlled>>,
    items: Query<(Entity, &SpawnOrder, &EntityType, &Position, &Collider), With<ItemCollider>>,
    mut ghosts: Query<&mut GhostState>,
) {
    let Ok((player_position, player_collider)) = players.single() else {
        return;
    };

    let mut collected: Vec<(SpawnOrder, Entity, EntityType, Vec2)> = items
        .iter()
        .filter(|(_, _, _, position, collider)| {
            intersects_pickup(player_position.0, player_collider.size, position.0, collider.size)
        })
        .map(|(entity, order, entity_type, position, _)| (*order, entity, *entity_type, position.0))
        .collect();
    collected.sort_unstable_by_key(|(order, ..)| *order);

    for (_, entity, entity_type, position) in collected {
        match entity_type {
            EntityType::Coin => {
                counts.coins = counts.coins.saturating_sub(1);
                events.write(ScoreEvent::CoinCollected);
            }
            EntityType::Fruit => {
                counts.fruits = counts.fruits.saturating_sub(1);
                events.write(ScoreEvent::FruitCollected);
                fruit_mode.0 = true;

                let feared = ghosts
                    .iter_mut()
                    .map(|mut ghost| ghost.set_feared(FEAR_DURATION))
                    .filter(|became_feared| *became_feared)
                    .count();
                debug!(feared, remaining = counts.fruits, "Fruit collected");
            }
            _ => continue,
        }

        let tile = maze.tile_of(position);
        if !maze.clear_pickup(tile) {
            trace!(?tile, "Collected pickup had no tile in the maze");
        }
        commands.entity(entity).despawn();
        changes.removed.push(entity);
    }
}

/// Ends fruit mode once no ghost is feared any more, closing the combo window.
pub fn fear_mode_system(
    mut fruit_mode: ResMut<FruitMode>,
    mut events: EventWriter<ScoreEvent>,
    ghosts: Query<&GhostState>,
) {
    if !fruit_mode.0 {
        return;
    }

    if !ghosts.iter().any(|ghost| ghost.mode == GhostMode::Feared) {
        fruit_mode.0 = false;
        events.write(ScoreEvent::FearEnded);
        debug!("Fruit mode ended");
    }
}
