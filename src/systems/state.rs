use bevy_ecs::{
    change_detection::DetectChangesMut,
    resource::Resource,
    system::{Res, ResMut},
};
use tracing::info;

use crate::systems::components::{FrameControl, FrameInput};

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum GameStage {
    /// A fresh level; nothing moves until the first directional input.
    #[default]
    WaitingToStart,
    /// Positions were reset after a death or a level change; waiting for input to resume.
    WaitingToRestart,
    /// The main gameplay loop is active.
    Playing,
    /// The last life was lost and its death animation has finished.
    GameOver,
}

impl GameStage {
    pub fn is_waiting(self) -> bool {
        matches!(self, GameStage::WaitingToStart | GameStage::WaitingToRestart)
    }
}

/// Holds the simulation until any directional input arrives.
///
/// The input that starts the game is also the player's first move.
pub fn start_gate_system(input: Res<FrameInput>, mut stage: ResMut<GameStage>, mut control: ResMut<FrameControl>) {
    match *stage {
        GameStage::Playing => {}
        GameStage::GameOver => control.halted = true,
        waiting => match input.0 {
            Some(direction) => {
                info!(from = ?waiting, ?direction, "Game started");
                stage.set_if_neq(GameStage::Playing);
            }
            None => control.halted = true,
        },
    }
}
