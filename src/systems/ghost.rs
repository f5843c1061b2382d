use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    constants::mechanics::{DEAD_ARRIVAL_DISTANCE, DEAD_SPEED_MULTIPLIER, FEARED_SPEED_MULTIPLIER},
    events::ScoreEvent,
    map::{builder::Maze, direction::Direction},
    systems::{
        behavior::{random_direction, DecisionContext},
        collision::intersects,
        components::{Collider, DeltaTime, FrameControl, FruitMode, GameRng, Ghost, PlayerControlled, Position, SpawnOrder},
        player::{PlayerLife, TileMover},
    },
};

/// The ghost state machine's discrete states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostMode {
    /// Sitting at the spawn until the release timer runs out.
    Waiting,
    Chasing,
    /// Vulnerable and wandering randomly.
    Feared,
    /// Eaten; returning to the spawn in a straight line.
    Dead,
    /// Removed after the player died, until positions are reset.
    Despawned,
}

impl GhostMode {
    /// Stable ordinal exposed to presentation layers.
    pub const fn ordinal(self) -> u8 {
        match self {
            GhostMode::Waiting => 0,
            GhostMode::Chasing => 1,
            GhostMode::Feared => 2,
            GhostMode::Dead => 3,
            GhostMode::Despawned => 4,
        }
    }

    pub const fn speed_multiplier(self) -> f32 {
        match self {
            GhostMode::Feared => FEARED_SPEED_MULTIPLIER,
            GhostMode::Dead => DEAD_SPEED_MULTIPLIER,
            GhostMode::Waiting | GhostMode::Chasing | GhostMode::Despawned => 1.0,
        }
    }
}

/// Per-ghost state machine data.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GhostState {
    pub mode: GhostMode,
    pub direction: Option<Direction>,
    /// Level speed in normalized units per second; the effective speed scales it by mode.
    pub base_speed: f32,
    pub spawn: Vec2,
    /// Seconds left before a waiting ghost is released.
    pub wait_timer: f32,
    /// Release delay restored after the player dies.
    pub wait_duration: f32,
    pub fear_timer: f32,
}

impl GhostState {
    pub fn new(ghost: Ghost, spawn: Vec2, base_speed: f32) -> Self {
        Self {
            mode: GhostMode::Waiting,
            direction: None,
            base_speed,
            spawn,
            wait_timer: ghost.wait_seconds(),
            wait_duration: ghost.wait_seconds(),
            fear_timer: 0.0,
        }
    }

    /// Effective speed, fully determined by the base speed and the current mode.
    pub fn speed(&self) -> f32 {
        self.base_speed * self.mode.speed_multiplier()
    }

    /// The timer relevant to the current mode, or zero.
    pub fn state_timer(&self) -> f32 {
        match self.mode {
            GhostMode::Waiting => self.wait_timer,
            GhostMode::Feared => self.fear_timer,
            _ => 0.0,
        }
    }

    /// Frightens an active ghost and reverses it on the spot.
    ///
    /// Waiting, dead and despawned ghosts are unaffected. Returns whether the ghost became feared.
    pub fn set_feared(&mut self, duration: f32) -> bool {
        if matches!(self.mode, GhostMode::Dead | GhostMode::Waiting | GhostMode::Despawned) {
            return false;
        }

        self.mode = GhostMode::Feared;
        self.fear_timer = duration;
        self.direction = self.direction.map(Direction::opposite);
        true
    }

    /// Eaten by the player: head back to the spawn.
    pub fn die(&mut self) {
        self.mode = GhostMode::Dead;
        self.fear_timer = 0.0;
    }

    /// Hidden after the player died.
    pub fn despawn(&mut self) {
        self.mode = GhostMode::Despawned;
        self.direction = None;
    }

    /// Back to the spawn with the full release delay.
    pub fn reset_for_player_death(&mut self, position: &mut Vec2) {
        self.mode = GhostMode::Waiting;
        self.direction = None;
        self.wait_timer = self.wait_duration;
        self.fear_timer = 0.0;
        *position = self.spawn;
    }

    /// Picks a direction: random while feared, otherwise the variant's own strategy.
    fn choose<R: Rng + ?Sized>(&self, ghost: Ghost, context: &DecisionContext, rng: &mut R) -> Option<Direction> {
        if self.mode == GhostMode::Feared {
            random_direction(context.legal, rng)
        } else {
            ghost.decide(context, rng)
        }
    }

    /// Advances one frame.
    ///
    /// `legal` holds the non-reversing, non-wall directions out of the ghost's current tile;
    /// `player` is the player's position and facing, used by the targeting strategies.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        ghost: Ghost,
        position: &mut Vec2,
        legal: &[Direction],
        player: (Vec2, Option<Direction>),
        maze: &Maze,
        dt: f32,
        rng: &mut R,
    ) {
        match self.mode {
            GhostMode::Despawned => return,
            GhostMode::Waiting => {
                self.wait_timer -= dt;
                if self.wait_timer > 0.0 {
                    return;
                }
                self.mode = GhostMode::Chasing;
                debug!(ghost = ?ghost, "Ghost released");
            }
            GhostMode::Feared => {
                self.fear_timer -= dt;
                if self.fear_timer <= 0.0 {
                    self.fear_timer = 0.0;
                    self.mode = GhostMode::Chasing;
                    debug!(ghost = ?ghost, "Ghost recovered from fear");
                }
            }
            GhostMode::Dead => {
                self.return_to_spawn(ghost, position, dt);
                return;
            }
            GhostMode::Chasing => {}
        }

        let context = |current: Option<Direction>, at: Vec2| DecisionContext {
            legal,
            current,
            ghost: maze.to_tile_space(at),
            player: maze.to_tile_space(player.0),
            player_facing: player.1,
        };

        if self.direction.is_none() {
            self.direction = self.choose(ghost, &context(None, *position), rng);
        }

        let center = maze.grid_center(*position);
        let travel = self.speed() * dt;

        let Some(direction) = self.direction else {
            // Nowhere to go. Stay centered on the tile.
            *position = center;
            return;
        };

        let (approaching, remaining) = match direction {
            Direction::Up => (position.y > center.y, (position.y - center.y).abs()),
            Direction::Down => (position.y < center.y, (position.y - center.y).abs()),
            Direction::Left => (position.x > center.x, (position.x - center.x).abs()),
            Direction::Right => (position.x < center.x, (position.x - center.x).abs()),
        };
        let blocked = !legal.contains(&direction);

        if blocked && !approaching {
            *position = center;
            self.direction = self.choose(ghost, &context(Some(direction), center), rng);
            trace!(ghost = ?ghost, from = ?direction, to = ?self.direction, "Ghost blocked, re-deciding");
            return;
        }

        if approaching && travel >= remaining {
            // Reaching the center: turn there and spend the leftover distance on the new heading.
            *position = center;
            let overshoot = travel - remaining;
            self.direction = self.choose(ghost, &context(Some(direction), center), rng);
            if let Some(next) = self.direction {
                *position += next.as_vec2() * overshoot;
            }
        } else {
            *position += direction.as_vec2() * travel;
        }

        match self.direction {
            Some(direction) if direction.is_vertical() => position.x = center.x,
            Some(_) => position.y = center.y,
            None => {}
        }
    }

    fn return_to_spawn(&mut self, ghost: Ghost, position: &mut Vec2, dt: f32) {
        let offset = self.spawn - *position;
        let distance = offset.length();

        if distance < DEAD_ARRIVAL_DISTANCE {
            // No release delay after being eaten: straight back to chasing.
            self.mode = GhostMode::Chasing;
            self.direction = None;
            *position = self.spawn;
            debug!(ghost = ?ghost, "Eaten ghost reached spawn");
        } else {
            let step = (self.speed() * dt).min(distance);
            *position += offset / distance * step;
        }
    }
}

/// Resolves ghost contact with the player, then moves every ghost in creation order.
///
/// Touching a feared ghost eats it. Touching a chasing ghost kills the player, hides every
/// ghost and ends the frame.
#[allow(clippy::too_many_arguments)]
#[allow(clippy::type_complexity)]
pub fn ghost_system(
    maze: Res<Maze>,
    delta_time: Res<DeltaTime>,
    mut rng: ResMut<GameRng>,
    mut control: ResMut<FrameControl>,
    mut fruit_mode: ResMut<FruitMode>,
    mut events: EventWriter<ScoreEvent>,
    mut players: Query<(&Position, &Collider, &mut TileMover, &mut PlayerLife), With<PlayerControlled>>,
    mut ghosts: Query<(Entity, &SpawnOrder, &Ghost, &mut GhostState, &mut Position, &Collider), Without<PlayerControlled>>,
) {
    let Ok((player_position, player_collider, mut mover, mut life)) = players.single_mut() else {
        return;
    };
    let player = (player_position.0, mover.direction);

    let mut order: Vec<(SpawnOrder, Entity)> = ghosts.iter().map(|(entity, order, ..)| (*order, entity)).collect();
    order.sort_unstable();

    let mut caught_by = None;

    for (_, entity) in order {
        let Ok((entity, _, ghost, mut state, mut position, collider)) = ghosts.get_mut(entity) else {
            continue;
        };
        let ghost = *ghost;

        if intersects(player_position.0, player_collider.size, position.0, collider.size) {
            match state.mode {
                GhostMode::Feared => {
                    debug!(ghost = ?ghost, "Ghost eaten");
                    events.write(ScoreEvent::GhostEaten(entity));
                    state.die();
                }
                GhostMode::Chasing => {
                    caught_by = Some(ghost);
                    break;
                }
                _ => {}
            }
        }

        let legal = maze.legal_directions(maze.tile_of(position.0), state.direction);
        state.update(ghost, &mut position.0, &legal, player, &maze, delta_time.0, &mut rng.0);
    }

    if let Some(ghost) = caught_by {
        life.die();
        mover.direction = None;
        mover.moving = false;
        debug!(ghost = ?ghost, lives = life.lives, "Player caught");

        for (_, _, _, mut state, ..) in ghosts.iter_mut() {
            state.despawn();
        }
        fruit_mode.0 = false;
        control.halted = true;
    }
}
