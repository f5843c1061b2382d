#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Headless driver: plays the simulation with a random input policy and logs the outcome.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use pacman_core::clock::FixedClock;
use pacman_core::constants::LOOP_TIME;
use pacman_core::formatter::FrameFormatter;
use pacman_core::game::{Game, GameConfig, MapSource};
use pacman_core::highscores::{Leaderboard, ScoreStore};
use pacman_core::map::direction::Direction;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use thousands::Separable;
use tracing::{debug, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Frames simulated when `PACMAN_FRAMES` is unset (one minute at 60 Hz).
const DEFAULT_FRAMES: u64 = 60 * 60;

/// Chance per frame that the driver presses a new direction.
const INPUT_CHANCE: f64 = 0.1;

struct RunnerConfig {
    game: GameConfig,
    frames: u64,
    realtime: bool,
}

impl RunnerConfig {
    fn from_env() -> Result<Self> {
        let mut game = GameConfig::default();

        if let Ok(path) = env::var("PACMAN_MAP") {
            game.map = MapSource::Path(PathBuf::from(path));
        }
        if let Ok(seed) = env::var("PACMAN_SEED") {
            game.seed = Some(seed.parse().with_context(|| format!("PACMAN_SEED is not a number: {seed:?}"))?);
        }

        let frames = match env::var("PACMAN_FRAMES") {
            Ok(frames) => frames
                .parse()
                .with_context(|| format!("PACMAN_FRAMES is not a number: {frames:?}"))?,
            Err(_) => DEFAULT_FRAMES,
        };
        let realtime = env::var("PACMAN_REALTIME").is_ok_and(|value| matches!(value.as_str(), "1" | "true" | "yes"));

        Ok(Self { game, frames, realtime })
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(true)
        .with_env_filter(filter)
        .event_format(FrameFormatter)
        .finish()
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(subscriber).context("Could not set global default subscriber")
}

/// Keeps the last direction most frames, occasionally pressing a new one.
fn next_input(rng: &mut SmallRng) -> Option<Direction> {
    if rng.random_bool(INPUT_CHANCE) {
        Direction::DIRECTIONS.choose(rng).copied()
    } else {
        None
    }
}

pub fn main() -> Result<()> {
    init_tracing()?;
    let config = RunnerConfig::from_env()?;

    let mut input_rng = match config.game.seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
        None => SmallRng::from_os_rng(),
    };
    let mut game = Game::with_clock(config.game, Box::new(FixedClock::new(LOOP_TIME)))?;

    info!(loop_time = ?LOOP_TIME, frames = config.frames, realtime = config.realtime, "Starting game loop");
    let started = Instant::now();

    for frame in 0..config.frames {
        let start = Instant::now();

        // Any press leaves the start and restart gates.
        let input = if game.stage().is_waiting() {
            Direction::DIRECTIONS.choose(&mut input_rng).copied()
        } else {
            next_input(&mut input_rng)
        };
        let changes = game.update(input);
        if !changes.removed.is_empty() {
            debug!(frame, removed = changes.removed.len(), "Entities removed");
        }

        if game.is_game_over() {
            info!(frame, "Player has no lives left");
            break;
        }
        if game.is_level_complete() {
            game.next_level()?;
        }

        if config.realtime {
            let elapsed = start.elapsed();
            if elapsed < LOOP_TIME {
                spin_sleep::sleep(LOOP_TIME - elapsed);
            } else {
                warn!(behind = ?(elapsed - LOOP_TIME), "Game loop behind schedule");
            }
        }
    }

    let mut leaderboard = Leaderboard::new();
    let rank = leaderboard.record("Runner", game.score());
    info!(
        score = %game.score().separate_with_commas(),
        level = game.level(),
        lives = game.lives(),
        rank = ?rank,
        elapsed = ?started.elapsed(),
        "Run finished"
    );
    print!("{leaderboard}");

    Ok(())
}
