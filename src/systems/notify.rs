//! Batched change notification for presentation layers.
//!
//! Instead of per-entity callbacks, every frame produces one [`ChangeSet`] naming the entities
//! whose observable state may have changed. Observers re-read state through snapshots.

use bevy_ecs::{
    change_detection::DetectChanges,
    entity::Entity,
    query::With,
    resource::Resource,
    system::{Local, Query, Res, ResMut},
};
use bitflags::bitflags;

use crate::systems::{
    components::{Level, PlayerControlled, SpawnOrder},
    player::PlayerLife,
    score::ScoreEngine,
    state::GameStage,
};

bitflags! {
    /// Derived queries whose value changed this frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HudFlags: u8 {
        const SCORE = 1 << 0;
        const LIVES = 1 << 1;
        const LEVEL = 1 << 2;
        const STAGE = 1 << 3;
    }
}

/// What changed during the most recent frame.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Every live entity, in creation order.
    pub changed: Vec<Entity>,
    /// Entities removed this frame (collected pickups).
    pub removed: Vec<Entity>,
    pub hud: HudFlags,
}

impl ChangeSet {
    pub fn clear(&mut self) {
        self.changed.clear();
        self.removed.clear();
        self.hud = HudFlags::empty();
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && self.hud.is_empty()
    }
}

/// Score and lives as of the previous notification.
#[derive(Default)]
pub struct HudMemory {
    score: Option<u32>,
    lives: Option<u32>,
}

/// Final system of the frame: fills the change set.
pub fn notify_system(
    mut memory: Local<HudMemory>,
    mut changes: ResMut<ChangeSet>,
    score: Res<ScoreEngine>,
    level: Res<Level>,
    stage: Res<GameStage>,
    entities: Query<(Entity, &SpawnOrder)>,
    players: Query<&PlayerLife, With<PlayerControlled>>,
) {
    let mut live: Vec<(SpawnOrder, Entity)> = entities.iter().map(|(entity, order)| (*order, entity)).collect();
    live.sort_unstable();
    changes.changed.extend(live.into_iter().map(|(_, entity)| entity));

    let total = score.total();
    if memory.score.replace(total) != Some(total) {
        changes.hud |= HudFlags::SCORE;
    }

    let lives = players.iter().next().map_or(0, |life| life.lives);
    if memory.lives.replace(lives) != Some(lives) {
        changes.hud |= HudFlags::LIVES;
    }

    if level.is_changed() {
        changes.hud |= HudFlags::LEVEL;
    }
    if stage.is_changed() {
        changes.hud |= HudFlags::STAGE;
    }
}
