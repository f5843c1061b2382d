//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod behavior;
pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod notify;
pub mod player;
pub mod score;
pub mod state;

pub use self::behavior::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::ghost::*;
pub use self::item::*;
pub use self::notify::*;
pub use self::player::*;
pub use self::score::*;
pub use self::state::*;
