//! Read-only views of simulation entities for presentation layers.

use bevy_ecs::{entity::Entity, world::EntityRef};
use glam::Vec2;

use crate::map::direction::Direction;
use crate::systems::{Collider, EntityType, Ghost, GhostState, PlayerLife, Position, TileMover};

/// The kind of a simulation entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Ghost(Ghost),
    Coin,
    Fruit,
}

/// The capability-query surface of an entity at one point in time.
///
/// Every kind reports every capability; those that do not apply hold neutral values
/// (no direction, not moving, ordinal 0, zero timer, sprite 0, alive, no lives).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub handle: Entity,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub direction: Option<Direction>,
    pub moving: bool,
    pub ai_state: u8,
    pub state_timer: f32,
    pub sprite_id: u8,
    pub dying: bool,
    pub lives: u32,
}

impl EntitySnapshot {
    /// A snapshot with only the geometry filled in.
    pub fn neutral(handle: Entity, kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            handle,
            kind,
            position,
            size,
            direction: None,
            moving: false,
            ai_state: 0,
            state_timer: 0.0,
            sprite_id: 0,
            dying: false,
            lives: 0,
        }
    }

    /// Reads a snapshot from an entity. `None` for entities that are not part of the simulation.
    pub fn read(entity: EntityRef) -> Option<Self> {
        let position = entity.get::<Position>()?.0;
        let size = entity.get::<Collider>()?.size;
        let handle = entity.id();

        let snapshot = match entity.get::<EntityType>()? {
            EntityType::Player => {
                let mover = entity.get::<TileMover>()?;
                let life = entity.get::<PlayerLife>()?;
                Self {
                    direction: mover.direction,
                    moving: mover.moving,
                    state_timer: life.death_timer,
                    dying: life.dying,
                    lives: life.lives,
                    ..Self::neutral(handle, EntityKind::Player, position, size)
                }
            }
            EntityType::Ghost => {
                let ghost = *entity.get::<Ghost>()?;
                let state = entity.get::<GhostState>()?;
                Self {
                    direction: state.direction,
                    moving: state.direction.is_some(),
                    ai_state: state.mode.ordinal(),
                    state_timer: state.state_timer(),
                    sprite_id: ghost.sprite_id(),
                    ..Self::neutral(handle, EntityKind::Ghost(ghost), position, size)
                }
            }
            EntityType::Coin => Self::neutral(handle, EntityKind::Coin, position, size),
            EntityType::Fruit => Self::neutral(handle, EntityKind::Fruit, position, size),
        };

        Some(snapshot)
    }
}
