use bevy_ecs::prelude::*;

/// Discrete gameplay happenings that carry points or reset scoring state.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreEvent {
    CoinCollected,
    FruitCollected,
    GhostEaten(Entity),
    PlayerDied,
    LevelCleared,
    /// The last feared ghost recovered, closing the combo window.
    FearEnded,
}
