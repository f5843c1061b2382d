//! This module contains the main game logic and state.

use std::fs;
use std::path::PathBuf;

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::{Or, With};
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule};
use bevy_ecs::world::World;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::constants::mechanics::{ghost_speed_for_level, STARTING_LIVES};
use crate::constants::{MapTile, RAW_BOARD};
use crate::entity::EntitySnapshot;
use crate::error::{GameError, GameResult};
use crate::events::ScoreEvent;
use crate::formatter;
use crate::map::builder::Maze;
use crate::map::direction::Direction;
use crate::systems::{
    fear_mode_system, frame_active, ghost_system, item_system, notify_system, player_death_system, player_movement_system,
    score_system, score_timer_system, start_gate_system, ChangeSet, Collider, DeltaTime, EntityType, FrameControl, FrameInput,
    FruitMode, GameRng, GameStage, GhostBundle, GhostCollider, GhostState, ItemBundle, ItemCollider, Level, PickupCount,
    PlayerBundle, PlayerControlled, PlayerLife, Position, ScoreEngine, SpawnOrder, TileMover,
};

/// Where level layouts come from. Every level reloads the same source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MapSource {
    /// The built-in [`RAW_BOARD`].
    #[default]
    Builtin,
    /// A map file on disk.
    Path(PathBuf),
    /// Map text held in memory.
    Text(String),
}

impl MapSource {
    /// Reads and parses the layout.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Io` if the file cannot be read and `GameError::MapParse` if the
    /// layout is malformed (for example, it has no player spawn).
    pub fn load(&self) -> GameResult<Maze> {
        match self {
            MapSource::Builtin => Maze::new(&RAW_BOARD),
            MapSource::Path(path) => {
                debug!(path = %path.display(), "Reading map file");
                let text = fs::read_to_string(path)?;
                Ok(Maze::from_text(&text)?)
            }
            MapSource::Text(text) => Ok(Maze::from_text(text)?),
        }
    }
}

/// Construction-time choices for a [`Game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub map: MapSource,
    /// Seed for the ghosts' random choices. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Lives at the start of a new game.
    pub lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map: MapSource::Builtin,
            seed: None,
            lives: STARTING_LIVES,
        }
    }
}

/// Core simulation state built on the Bevy ECS architecture.
///
/// The `World` owns every entity (player, ghosts, coins, fruits) and the maze, while the
/// `Schedule` runs the per-frame systems in a fixed order. One call to [`Game::update`]
/// advances exactly one frame.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    clock: Box<dyn Clock>,
    config: GameConfig,
    player: Entity,
}

impl Game {
    /// Creates a game timed by the wall clock.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    /// Creates a game driven by the given clock.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the map source cannot be read or parsed.
    pub fn with_clock(config: GameConfig, clock: Box<dyn Clock>) -> GameResult<Game> {
        info!(map = ?config.map, seed = ?config.seed, "Starting game initialization");
        let maze = config.map.load()?;

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, &config);
        Self::configure_schedule(&mut schedule);

        let player = Self::spawn_player(&mut world, &maze, config.lives);
        Self::spawn_level(&mut world, &maze, ghost_speed_for_level(1));
        world.insert_resource(maze);

        info!("Game initialization completed successfully");
        Ok(Game {
            world,
            schedule,
            clock,
            config,
            player,
        })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<ScoreEvent>(world);
    }

    fn insert_resources(world: &mut World, config: &GameConfig) {
        world.insert_resource(ScoreEngine::default());
        world.insert_resource(GameRng::new(config.seed));
        world.insert_resource(GameStage::default());
        world.insert_resource(Level::default());
        world.insert_resource(FruitMode::default());
        world.insert_resource(PickupCount::default());
        world.insert_resource(ChangeSet::default());
        world.insert_resource(DeltaTime::default());
        world.insert_resource(FrameInput::default());
        world.insert_resource(FrameControl::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                score_timer_system,
                player_death_system,
                start_gate_system.run_if(frame_active),
                player_movement_system.run_if(frame_active),
                ghost_system.run_if(frame_active),
                item_system.run_if(frame_active),
                fear_mode_system.run_if(frame_active),
                score_system,
                notify_system,
            )
                .chain(),
        );
    }

    fn spawn_player(world: &mut World, maze: &Maze, lives: u32) -> Entity {
        let spawn = maze.player_spawn();
        world
            .spawn(PlayerBundle {
                player: PlayerControlled,
                position: Position(maze.tile_center(spawn)),
                mover: TileMover::new(spawn),
                life: PlayerLife::with_lives(spawn, lives),
                entity_type: EntityType::Player,
                collider: Collider { size: maze.tile_size() },
                order: SpawnOrder(0),
            })
            .id()
    }

    /// Spawns ghosts and pickups in reading order, after the player.
    fn spawn_level(world: &mut World, maze: &Maze, ghost_speed: f32) {
        let collider = Collider { size: maze.tile_size() };
        let mut counts = PickupCount::default();
        let mut order = 0;

        for (tile, kind) in maze.tiles() {
            let position = Position(maze.tile_center(tile));
            let entity_type = match kind {
                MapTile::Coin => {
                    counts.coins += 1;
                    EntityType::Coin
                }
                MapTile::Fruit => {
                    counts.fruits += 1;
                    EntityType::Fruit
                }
                MapTile::GhostSpawn(ghost) => {
                    order += 1;
                    world.spawn(GhostBundle {
                        ghost,
                        state: GhostState::new(ghost, position.0, ghost_speed),
                        position,
                        entity_type: EntityType::Ghost,
                        collider,
                        ghost_collider: GhostCollider,
                        order: SpawnOrder(order),
                    });
                    continue;
                }
                _ => continue,
            };

            order += 1;
            world.spawn(ItemBundle {
                position,
                entity_type,
                collider,
                item_collider: ItemCollider,
                order: SpawnOrder(order),
            });
        }

        debug!(coins = counts.coins, fruits = counts.fruits, ghost_speed, "Level entities spawned");
        world.insert_resource(counts);
    }

    /// Removes every ghost and pickup of the current level.
    fn despawn_level(&mut self) {
        let entities: Vec<Entity> = self
            .world
            .query_filtered::<Entity, Or<(With<GhostCollider>, With<ItemCollider>)>>()
            .iter(&self.world)
            .collect();
        for entity in entities {
            self.world.despawn(entity);
        }
    }

    /// Returns the player to the maze's spawn, optionally restoring lives.
    fn respawn_player(&mut self, maze: &Maze, lives: Option<u32>) -> GameResult<()> {
        let spawn = maze.player_spawn();
        let mut player = self
            .world
            .get_entity_mut(self.player)
            .map_err(|_| GameError::InvalidState("player entity no longer exists".to_string()))?;

        if let Some(mut mover) = player.get_mut::<TileMover>() {
            mover.reset(spawn);
        }
        if let Some(mut life) = player.get_mut::<PlayerLife>() {
            life.spawn = spawn;
            life.respawn();
            if let Some(lives) = lives {
                life.lives = lives;
            }
        }
        if let Some(mut position) = player.get_mut::<Position>() {
            position.0 = maze.tile_center(spawn);
        }
        if let Some(mut collider) = player.get_mut::<Collider>() {
            collider.size = maze.tile_size();
        }
        Ok(())
    }

    /// Reloads the layout and replaces the level's ghosts and pickups.
    fn load_level(&mut self, maze: Maze, level: u32, lives: Option<u32>, stage: GameStage) -> GameResult<()> {
        let ghost_speed = ghost_speed_for_level(level);

        self.respawn_player(&maze, lives)?;
        self.despawn_level();
        Self::spawn_level(&mut self.world, &maze, ghost_speed);
        self.world.insert_resource(maze);
        self.world.insert_resource(Level(level));
        self.world.insert_resource(FruitMode(false));
        self.world.insert_resource(stage);
        Ok(())
    }

    /// Advances one frame using the configured clock.
    pub fn update(&mut self, input: Option<Direction>) -> &ChangeSet {
        let dt = self.clock.tick();
        self.advance(input, dt)
    }

    /// Advances one frame by exactly `dt` seconds.
    ///
    /// Returns the entities whose state may have changed this frame.
    pub fn advance(&mut self, input: Option<Direction>, dt: f32) -> &ChangeSet {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.world.insert_resource(DeltaTime(dt));
        self.world.insert_resource(FrameInput(input));
        self.world.insert_resource(FrameControl::default());
        self.world.resource_mut::<ChangeSet>().clear();

        self.schedule.run(&mut self.world);

        self.world.resource_mut::<Events<ScoreEvent>>().update();
        self.world.clear_trackers();
        formatter::increment_frame();

        self.world.resource::<ChangeSet>()
    }

    /// Moves on to the next level after the current one is cleared.
    ///
    /// Awards the level-clear bonus, regenerates the maze and its pickups, and speeds the
    /// ghosts up. Score and lives carry over.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the map source can no longer be loaded. The current level is
    /// left untouched in that case.
    pub fn next_level(&mut self) -> GameResult<()> {
        let maze = self.config.map.load()?;

        let bonus = self.world.resource_mut::<ScoreEngine>().apply(&ScoreEvent::LevelCleared);
        let level = self.level() + 1;
        self.load_level(maze, level, None, GameStage::WaitingToRestart)?;

        info!(
            level,
            bonus,
            score = self.score(),
            ghost_speed = ghost_speed_for_level(level),
            "Level cleared"
        );
        Ok(())
    }

    /// Starts a new game: level 1, zero score, full lives.
    pub fn reset(&mut self) -> GameResult<()> {
        let maze = self.config.map.load()?;

        self.world.resource_mut::<ScoreEngine>().reset();
        self.load_level(maze, 1, Some(self.config.lives), GameStage::WaitingToStart)?;

        info!("New game");
        Ok(())
    }

    /// The changes recorded by the most recent frame.
    pub fn changes(&self) -> &ChangeSet {
        self.world.resource::<ChangeSet>()
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<ScoreEngine>().total()
    }

    pub fn lives(&self) -> u32 {
        self.world.get::<PlayerLife>(self.player).map_or(0, |life| life.lives)
    }

    pub fn level(&self) -> u32 {
        self.world.resource::<Level>().0
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn coins_remaining(&self) -> u32 {
        self.world.resource::<PickupCount>().coins
    }

    /// Every coin has been collected.
    pub fn is_level_complete(&self) -> bool {
        self.coins_remaining() == 0
    }

    /// No lives remain and the final death animation has finished.
    pub fn is_game_over(&self) -> bool {
        self.world.get::<PlayerLife>(self.player).is_some_and(PlayerLife::is_game_over)
    }

    /// Ghost base speed for the current level.
    pub fn ghost_speed(&self) -> f32 {
        ghost_speed_for_level(self.level())
    }

    pub fn maze(&self) -> &Maze {
        self.world.resource::<Maze>()
    }

    /// Handle of the player entity. Stable for the lifetime of the game.
    pub fn player(&self) -> Entity {
        self.player
    }

    /// Reads one entity's query surface. `None` once the entity has been removed.
    pub fn snapshot(&self, handle: Entity) -> Option<EntitySnapshot> {
        self.world.get_entity(handle).ok().and_then(EntitySnapshot::read)
    }

    /// Snapshots of every live entity, in creation order.
    pub fn snapshots(&mut self) -> Vec<EntitySnapshot> {
        let mut handles: Vec<(SpawnOrder, Entity)> = self
            .world
            .query::<(Entity, &SpawnOrder)>()
            .iter(&self.world)
            .map(|(entity, order)| (*order, entity))
            .collect();
        handles.sort_unstable();

        handles.into_iter().filter_map(|(_, handle)| self.snapshot(handle)).collect()
    }
}
