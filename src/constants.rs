//! This module contains all the constants used in the simulation.

use std::time::Duration;

use crate::systems::components::Ghost;

/// Target frame time for the realtime runner (60 Hz).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Movement, timing and lifecycle tuning.
pub mod mechanics {
    /// Player speed, in tiles per second.
    pub const PLAYER_TILES_PER_SECOND: f32 = 5.0;
    /// Ghost speed on level 1, in normalized units per second.
    pub const GHOST_BASE_SPEED: f32 = 0.30;
    /// Additional ghost speed per level beyond the first, as a fraction of the base speed.
    pub const LEVEL_SPEED_STEP: f32 = 0.15;

    /// Speed multiplier while a ghost is feared.
    pub const FEARED_SPEED_MULTIPLIER: f32 = 0.5;
    /// Speed multiplier while an eaten ghost returns to its spawn.
    pub const DEAD_SPEED_MULTIPLIER: f32 = 2.5;
    /// An eaten ghost closer than this to its spawn has arrived.
    pub const DEAD_ARRIVAL_DISTANCE: f32 = 0.1;

    /// How long ghosts stay feared after a fruit is collected, in seconds.
    pub const FEAR_DURATION: f32 = 5.0;
    /// Length of the player's death animation, in seconds.
    pub const DEATH_DURATION: f32 = 1.0;
    /// Lives at the start of a new game.
    pub const STARTING_LIVES: u32 = 3;

    /// Ghost base speed for the given (1-based) level.
    pub fn ghost_speed_for_level(level: u32) -> f32 {
        GHOST_BASE_SPEED * level_speed_multiplier(level)
    }

    /// `1 + 0.15 × (level − 1)`
    pub fn level_speed_multiplier(level: u32) -> f32 {
        1.0 + LEVEL_SPEED_STEP * level.saturating_sub(1) as f32
    }
}

/// Bounding-box tolerances.
pub mod collider {
    /// Inward shrink applied to every edge before an overlap test.
    pub const EPSILON: f32 = 0.008;
    /// Scale applied to the collector's box when testing pickups and ghost contact.
    pub const PICKUP_SHRINK: f32 = 0.5;
}

/// Point values and timing windows used by the score engine.
pub mod score {
    pub const COIN_POINTS: u32 = 10;
    pub const FRUIT_POINTS: u32 = 50;
    pub const GHOST_POINTS: u32 = 200;
    pub const LEVEL_CLEAR_BONUS: u32 = 500;

    /// Coins collected faster than this after the previous one score triple.
    pub const FAST_COIN_WINDOW: f32 = 1.0;
    /// Coins collected faster than this (but not fast) score double.
    pub const MEDIUM_COIN_WINDOW: f32 = 3.0;
}

pub mod leaderboard {
    /// Number of entries kept by a leaderboard.
    pub const MAX_ENTRIES: usize = 5;
    /// Longest name stored with an entry.
    pub const MAX_NAME_LENGTH: usize = 10;
    pub const DEFAULT_NAME: &str = "Player";
}

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapTile {
    /// An empty, walkable tile.
    Empty,
    /// A wall tile.
    Wall,
    /// A coin.
    Coin,
    /// A fruit, which frightens the ghosts.
    Fruit,
    /// The player's starting position.
    PlayerSpawn,
    /// A ghost's starting position.
    GhostSpawn(Ghost),
}

/// Number of rows in [`RAW_BOARD`].
pub const BOARD_HEIGHT: usize = 17;

/// The built-in maze, used when no map file is configured.
pub const RAW_BOARD: [&str; BOARD_HEIGHT] = [
    "#####################",
    "#f00000000#00000000f#",
    "#0###0###0#0###0###0#",
    "#0000000000000000000#",
    "#0###0#0#####0#0###0#",
    "#00000#000#000#00000#",
    "#####0### # ###0#####",
    "#####0# RI BO #0#####",
    "#####0# ##### #0#####",
    "#00000000 P 00000000#",
    "#0###0###0#0###0###0#",
    "#f000#000000000#000f#",
    "###0#0#0#####0#0#0###",
    "#00000#000#000#00000#",
    "#0#######0#0#######0#",
    "#0000000000000000000#",
    "#####################",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_board_is_rectangular() {
        let width = RAW_BOARD[0].len();
        for (row, line) in RAW_BOARD.iter().enumerate() {
            assert_eq!(line.len(), width, "row {row} has the wrong width");
        }
    }

    #[test]
    fn raw_board_has_single_player() {
        let players: usize = RAW_BOARD.iter().map(|line| line.matches('P').count()).sum();
        assert_eq!(players, 1);
    }

    #[test]
    fn level_multiplier_grows_linearly() {
        assert_eq!(mechanics::level_speed_multiplier(1), 1.0);
        assert!((mechanics::level_speed_multiplier(3) - 1.3).abs() < 1e-6);
        assert!((mechanics::ghost_speed_for_level(2) - 0.345).abs() < 1e-6);
    }
}
