//! Headless simulation core for an arcade maze-chase game.
//!
//! A [`game::Game`] owns the maze and its entities and advances one frame per call. Rendering,
//! audio and input devices live outside the crate and talk to it through entity handles,
//! [`entity::EntitySnapshot`] queries and the per-frame [`systems::ChangeSet`].

pub mod clock;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod highscores;
pub mod map;
pub mod systems;
