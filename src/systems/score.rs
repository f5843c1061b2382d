//! Skill-based scoring: time-windowed coin multipliers and a ghost combo counter.

use bevy_ecs::{event::EventReader, resource::Resource, system::{Res, ResMut}};
use tracing::debug;

use crate::constants::score::{
    COIN_POINTS, FAST_COIN_WINDOW, FRUIT_POINTS, GHOST_POINTS, LEVEL_CLEAR_BONUS, MEDIUM_COIN_WINDOW,
};
use crate::events::ScoreEvent;
use crate::systems::components::DeltaTime;

/// Running score plus the two pieces of state that shape future awards.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ScoreEngine {
    total: u32,
    since_last_coin: f32,
    combo: u32,
}

impl ScoreEngine {
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Ghosts eaten in the current fear window.
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn since_last_coin(&self) -> f32 {
        self.since_last_coin
    }

    /// Advances the coin timer. Called once per frame before any event is applied.
    pub fn tick(&mut self, dt: f32) {
        self.since_last_coin += dt;
    }

    /// Applies an event and returns the points it awarded.
    pub fn apply(&mut self, event: &ScoreEvent) -> u32 {
        let points = match event {
            ScoreEvent::CoinCollected => {
                let multiplier = Self::coin_multiplier(self.since_last_coin);
                self.since_last_coin = 0.0;
                COIN_POINTS * multiplier
            }
            ScoreEvent::FruitCollected => {
                self.combo = 0;
                FRUIT_POINTS
            }
            ScoreEvent::GhostEaten(_) => {
                self.combo += 1;
                Self::ghost_points(self.combo)
            }
            ScoreEvent::PlayerDied => {
                self.combo = 0;
                self.since_last_coin = 0.0;
                0
            }
            ScoreEvent::LevelCleared => {
                self.combo = 0;
                self.since_last_coin = 0.0;
                LEVEL_CLEAR_BONUS
            }
            ScoreEvent::FearEnded => {
                self.combo = 0;
                0
            }
        };

        self.total = self.total.saturating_add(points);
        points
    }

    /// Starts a new game.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// ×3 under one second, ×2 under three, ×1 otherwise.
    pub fn coin_multiplier(since_last_coin: f32) -> u32 {
        if since_last_coin < FAST_COIN_WINDOW {
            3
        } else if since_last_coin < MEDIUM_COIN_WINDOW {
            2
        } else {
            1
        }
    }

    /// 200, 400, 800, 1600, ... for the 1st, 2nd, 3rd, 4th ghost of a fear window.
    pub fn ghost_points(combo: u32) -> u32 {
        let doublings = combo.saturating_sub(1).min(16);
        GHOST_POINTS.saturating_mul(1 << doublings)
    }
}

/// Feeds the frame's elapsed time to the coin timer.
pub fn score_timer_system(delta_time: Res<DeltaTime>, mut score: ResMut<ScoreEngine>) {
    score.tick(delta_time.0);
}

/// Applies every score event written this frame.
pub fn score_system(mut events: EventReader<ScoreEvent>, mut score: ResMut<ScoreEngine>) {
    for event in events.read() {
        let points = score.apply(event);
        debug!(?event, points, total = score.total(), combo = score.combo(), "Score event applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_windows() {
        assert_eq!(ScoreEngine::coin_multiplier(0.0), 3);
        assert_eq!(ScoreEngine::coin_multiplier(0.999), 3);
        assert_eq!(ScoreEngine::coin_multiplier(1.0), 2);
        assert_eq!(ScoreEngine::coin_multiplier(2.999), 2);
        assert_eq!(ScoreEngine::coin_multiplier(3.0), 1);
    }

    #[test]
    fn ghost_points_double() {
        let points: Vec<u32> = (1..=5).map(ScoreEngine::ghost_points).collect();
        assert_eq!(points, vec![200, 400, 800, 1600, 3200]);
    }
}
