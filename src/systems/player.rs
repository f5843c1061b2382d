use bevy_ecs::{
    change_detection::DetectChangesMut,
    component::Component,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::{IVec2, Vec2};
use tracing::{debug, info, trace};

use crate::{
    constants::mechanics::{DEATH_DURATION, PLAYER_TILES_PER_SECOND, STARTING_LIVES},
    events::ScoreEvent,
    map::{builder::Maze, direction::Direction},
    systems::{
        components::{DeltaTime, FrameControl, FrameInput, PlayerControlled, Position},
        ghost::GhostState,
        state::GameStage,
    },
};

/// Tile-to-tile movement state for the player.
///
/// The logical position is always a whole tile; `progress` interpolates toward the next tile
/// in `direction` for rendering and contact tests.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TileMover {
    pub tile: IVec2,
    /// Fraction of the way to the next tile, always within `[0, 1]`.
    pub progress: f32,
    /// Committed direction of travel, `None` while standing still.
    pub direction: Option<Direction>,
    /// The most recent input not yet acted upon.
    pub buffered: Option<Direction>,
    pub moving: bool,
}

impl TileMover {
    pub fn new(tile: IVec2) -> Self {
        Self {
            tile,
            progress: 0.0,
            direction: None,
            buffered: None,
            moving: false,
        }
    }

    /// Forgets all motion and stands on `tile`.
    pub fn reset(&mut self, tile: IVec2) {
        *self = Self::new(tile);
    }

    /// Advances one frame. `progress_delta` is the tile fraction covered this frame.
    ///
    /// Returns `true` if the frame performed an instant reversal.
    pub fn step(&mut self, input: Option<Direction>, progress_delta: f32, maze: &Maze) -> bool {
        if input.is_some() {
            self.buffered = input;
        }

        let reversed = match (self.direction, self.buffered) {
            (Some(current), Some(wanted)) if wanted == current.opposite() && self.progress > 0.0 => {
                // Interpolating p along A->B is the same point as 1-p along B->A.
                self.tile += current.as_ivec2();
                self.direction = Some(wanted);
                self.buffered = None;
                self.progress = 1.0 - self.progress;
                true
            }
            _ => false,
        };

        if !reversed && self.progress == 0.0 {
            if let Some(wanted) = self.buffered.filter(|wanted| Some(*wanted) != self.direction) {
                if !maze.is_wall(self.tile + wanted.as_ivec2()) {
                    trace!(tile = ?self.tile, direction = ?wanted, "Player turned");
                    self.direction = Some(wanted);
                    self.buffered = None;
                }
            }

            if let Some(current) = self.direction {
                if maze.is_wall(self.tile + current.as_ivec2()) {
                    trace!(tile = ?self.tile, direction = ?current, "Player stopped at wall");
                    self.direction = None;
                }
            }
        }

        match self.direction {
            Some(direction) => {
                self.moving = true;
                self.progress += progress_delta;
                if self.progress >= 1.0 {
                    // Overshoot is dropped: every tile is entered from its center.
                    self.tile += direction.as_ivec2();
                    self.progress = 0.0;
                }
            }
            None => self.moving = false,
        }

        reversed
    }

    /// The continuous position between the current tile's center and the next one's.
    pub fn position(&self, maze: &Maze) -> Vec2 {
        let current = maze.tile_center(self.tile);
        match self.direction {
            Some(direction) if self.progress > 0.0 => {
                let next = maze.tile_center(self.tile + direction.as_ivec2());
                current.lerp(next, self.progress)
            }
            _ => current,
        }
    }
}

/// Lives and the death animation timer.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerLife {
    pub lives: u32,
    pub dying: bool,
    /// Seconds since the death animation started.
    pub death_timer: f32,
    pub spawn: IVec2,
}

impl PlayerLife {
    pub fn new(spawn: IVec2) -> Self {
        Self::with_lives(spawn, STARTING_LIVES)
    }

    pub fn with_lives(spawn: IVec2, lives: u32) -> Self {
        Self {
            lives,
            dying: false,
            death_timer: 0.0,
            spawn,
        }
    }

    /// Loses a life and starts the death animation.
    pub fn die(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.dying = true;
        self.death_timer = 0.0;
    }

    pub fn respawn(&mut self) {
        self.dying = false;
        self.death_timer = 0.0;
    }

    pub fn is_death_complete(&self) -> bool {
        self.death_timer >= DEATH_DURATION
    }

    /// No lives left and the final death animation has finished.
    pub fn is_game_over(&self) -> bool {
        self.lives == 0 && self.dying && self.is_death_complete()
    }
}

/// Drives the player's tile controller from this frame's input.
pub fn player_movement_system(
    maze: Res<Maze>,
    delta_time: Res<DeltaTime>,
    input: Res<FrameInput>,
    mut players: Query<(&mut TileMover, &mut Position), With<PlayerControlled>>,
) {
    let progress_delta = PLAYER_TILES_PER_SECOND * delta_time.0;

    for (mut mover, mut position) in players.iter_mut() {
        if mover.step(input.0, progress_delta, &maze) {
            debug!(tile = ?mover.tile, direction = ?mover.direction, progress = mover.progress, "Instant reversal");
        }
        position.0 = mover.position(&maze);
    }
}

/// Plays out the death animation. While it runs, the rest of the frame is skipped.
///
/// When it finishes with lives remaining, the player and every ghost return to their
/// spawns and the game waits for input before resuming.
#[allow(clippy::type_complexity)]
pub fn player_death_system(
    maze: Res<Maze>,
    delta_time: Res<DeltaTime>,
    mut control: ResMut<FrameControl>,
    mut stage: ResMut<GameStage>,
    mut events: EventWriter<ScoreEvent>,
    mut players: Query<(&mut PlayerLife, &mut TileMover, &mut Position), With<PlayerControlled>>,
    mut ghosts: Query<(&mut GhostState, &mut Position), Without<PlayerControlled>>,
) {
    for (mut life, mut mover, mut position) in players.iter_mut() {
        if !life.dying {
            continue;
        }

        control.halted = true;
        if life.is_game_over() {
            continue;
        }

        life.death_timer += delta_time.0;
        if !life.is_death_complete() {
            continue;
        }

        if life.lives > 0 {
            events.write(ScoreEvent::PlayerDied);
            life.respawn();
            mover.reset(life.spawn);
            position.0 = maze.tile_center(life.spawn);

            for (mut ghost, mut ghost_position) in ghosts.iter_mut() {
                ghost.reset_for_player_death(&mut ghost_position.0);
            }

            stage.set_if_neq(GameStage::WaitingToRestart);
            debug!(lives = life.lives, "Positions reset, waiting for input");
        } else if stage.set_if_neq(GameStage::GameOver) {
            info!("Game over");
        }
    }
}
