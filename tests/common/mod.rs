#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::{IVec2, Vec2};
use pacman_core::{
    clock::FixedClock,
    events::ScoreEvent,
    game::{Game, GameConfig, MapSource},
    map::builder::Maze,
    systems::{
        ChangeSet, Collider, DeltaTime, EntityType, FrameControl, FrameInput, FruitMode, GameRng, GameStage, Ghost, GhostBundle,
        GhostCollider, GhostMode, GhostState, ItemBundle, ItemCollider, Level, PickupCount, PlayerBundle, PlayerControlled,
        PlayerLife, Position, ScoreEngine, SpawnOrder, TileMover,
    },
};

pub const FRAME: f32 = 1.0 / 60.0;

/// A straight corridor: the player at (1, 1) and four coins to its right.
pub const COIN_CORRIDOR: [&str; 3] = ["#########", "#P0000  #", "#########"];

/// An L-shaped corridor that turns down at (3, 1).
pub const L_CORRIDOR: [&str; 4] = ["#####", "#P00#", "###0#", "#####"];

/// The player and a red ghost (released immediately) share a dead-end corridor.
pub const GHOST_CORRIDOR: [&str; 3] = ["#######", "#P  R #", "#######"];

/// A plus-shaped junction around (2, 2).
pub const CROSSROADS: [&str; 5] = ["#####", "## ##", "# P #", "## ##", "#####"];

pub fn create_test_maze(rows: &[&str]) -> Maze {
    Maze::new(rows).expect("Failed to create test maze")
}

/// Creates a world holding every resource the gameplay systems read.
pub fn create_test_world(rows: &[&str]) -> World {
    let mut world = World::new();

    world.insert_resource(Events::<ScoreEvent>::default());
    world.insert_resource(create_test_maze(rows));
    world.insert_resource(ScoreEngine::default());
    world.insert_resource(GameRng::new(Some(42)));
    world.insert_resource(GameStage::Playing);
    world.insert_resource(Level::default());
    world.insert_resource(FruitMode::default());
    world.insert_resource(PickupCount::default());
    world.insert_resource(ChangeSet::default());
    world.insert_resource(DeltaTime(FRAME));
    world.insert_resource(FrameInput::default());
    world.insert_resource(FrameControl::default());

    world
}

fn tile_geometry(world: &World, tile: IVec2) -> (Vec2, Vec2) {
    let maze = world.resource::<Maze>();
    (maze.tile_center(tile), maze.tile_size())
}

/// Spawns the player standing still on `tile`.
pub fn spawn_test_player(world: &mut World, tile: IVec2) -> Entity {
    let (center, size) = tile_geometry(world, tile);
    world
        .spawn(PlayerBundle {
            player: PlayerControlled,
            position: Position(center),
            mover: TileMover::new(tile),
            life: PlayerLife::new(tile),
            entity_type: EntityType::Player,
            collider: Collider { size },
            order: SpawnOrder(0),
        })
        .id()
}

/// Spawns a ghost centered on `tile` in the given mode.
pub fn spawn_test_ghost(world: &mut World, ghost: Ghost, tile: IVec2, mode: GhostMode, order: u32) -> Entity {
    let (center, size) = tile_geometry(world, tile);
    let mut state = GhostState::new(ghost, center, 0.3);
    state.mode = mode;

    world
        .spawn(GhostBundle {
            ghost,
            state,
            position: Position(center),
            entity_type: EntityType::Ghost,
            collider: Collider { size },
            ghost_collider: GhostCollider,
            order: SpawnOrder(order),
        })
        .id()
}

/// Spawns a coin or fruit on `tile` and counts it.
pub fn spawn_test_item(world: &mut World, tile: IVec2, item_type: EntityType, order: u32) -> Entity {
    let (center, size) = tile_geometry(world, tile);
    {
        let mut counts = world.resource_mut::<PickupCount>();
        match item_type {
            EntityType::Coin => counts.coins += 1,
            EntityType::Fruit => counts.fruits += 1,
            _ => {}
        }
    }

    world
        .spawn(ItemBundle {
            position: Position(center),
            entity_type: item_type,
            collider: Collider { size },
            item_collider: ItemCollider,
            order: SpawnOrder(order),
        })
        .id()
}

/// Queues a score event for the next system run.
pub fn send_score_event(world: &mut World, event: ScoreEvent) {
    let mut events = world.resource_mut::<Events<ScoreEvent>>();
    events.send(event);
}

/// Removes and returns every pending score event.
pub fn drain_score_events(world: &mut World) -> Vec<ScoreEvent> {
    world.resource_mut::<Events<ScoreEvent>>().drain().collect()
}

/// A seeded game on an in-memory map, stepped at 60 Hz.
pub fn create_test_game(rows: &[&str]) -> Game {
    create_test_game_with_lives(rows, 3)
}

pub fn create_test_game_with_lives(rows: &[&str], lives: u32) -> Game {
    let config = GameConfig {
        map: MapSource::Text(rows.join("\n")),
        seed: Some(7),
        lives,
    };
    Game::with_clock(config, Box::new(FixedClock::from_secs(FRAME))).expect("Failed to create test game")
}

pub fn approx_eq(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-5
}
