use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource, system::Res};
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};
use strum_macros::EnumIter;

use crate::map::direction::Direction;
use crate::systems::ghost::GhostState;
use crate::systems::player::{PlayerLife, TileMover};

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A tag component denoting the type of entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Player,
    Ghost,
    Coin,
    Fruit,
}

/// The four ghost variants. Each has its own release delay and targeting strategy.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Ghost {
    Red,
    Pink,
    Blue,
    Orange,
}

impl Ghost {
    /// Seconds a ghost waits at its spawn before it starts chasing.
    pub const fn wait_seconds(self) -> f32 {
        match self {
            Ghost::Red => 0.0,
            Ghost::Pink => 0.0,
            Ghost::Blue => 5.0,
            Ghost::Orange => 10.0,
        }
    }

    /// Fixed sprite identity used by presentation layers.
    pub const fn sprite_id(self) -> u8 {
        match self {
            Ghost::Red => 0,
            Ghost::Pink => 1,
            Ghost::Blue => 2,
            Ghost::Orange => 3,
        }
    }

    /// The map character marking this ghost's spawn. Pink uses `I`.
    pub const fn as_char(self) -> char {
        match self {
            Ghost::Red => 'R',
            Ghost::Pink => 'I',
            Ghost::Blue => 'B',
            Ghost::Orange => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Ghost> {
        match c {
            'R' => Some(Ghost::Red),
            'I' => Some(Ghost::Pink),
            'B' => Some(Ghost::Blue),
            'O' => Some(Ghost::Orange),
            _ => None,
        }
    }
}

/// Center of an entity in normalized maze space.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub size: Vec2,
}

/// Marker components for collision filtering
#[derive(Component, Default)]
pub struct GhostCollider;

#[derive(Component, Default)]
pub struct ItemCollider;

/// Creation order of an entity within its level. Systems iterate agents in this order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnOrder(pub u32);

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub position: Position,
    pub mover: TileMover,
    pub life: PlayerLife,
    pub entity_type: EntityType,
    pub collider: Collider,
    pub order: SpawnOrder,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub state: GhostState,
    pub position: Position,
    pub entity_type: EntityType,
    pub collider: Collider,
    pub ghost_collider: GhostCollider,
    pub order: SpawnOrder,
}

#[derive(Bundle)]
pub struct ItemBundle {
    pub position: Position,
    pub entity_type: EntityType,
    pub collider: Collider,
    pub item_collider: ItemCollider,
    pub order: SpawnOrder,
}

/// Seconds elapsed since the previous frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// The directional input for the current frame, if any.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameInput(pub Option<Direction>);

/// Per-frame short-circuit flag. Once halted, the remaining gameplay systems skip this frame.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameControl {
    pub halted: bool,
}

/// Run condition for gameplay systems.
pub fn frame_active(control: Res<FrameControl>) -> bool {
    !control.halted
}

/// The simulation's single source of randomness.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    /// Seeded generators replay identically; without a seed the OS provides one.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_os_rng()),
        }
    }
}

/// Set while a collected fruit keeps at least one ghost feared.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FruitMode(pub bool);

/// The current (1-based) level.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level(pub u32);

impl Default for Level {
    fn default() -> Self {
        Self(1)
    }
}

/// Remaining pickups in the current level.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickupCount {
    pub coins: u32,
    pub fruits: u32,
}
