//! Axis-aligned bounding-box contact tests shared by every entity.

use glam::Vec2;

use crate::constants::collider::{EPSILON, PICKUP_SHRINK};

/// An axis-aligned box described by its center and full size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// The same box scaled about its center.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            center: self.center,
            size: self.size * factor,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// Strict overlap after pulling every edge of both boxes inward by [`EPSILON`].
    ///
    /// Boxes that merely touch (adjacent tiles) never intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min() + EPSILON, self.max() - EPSILON);
        let (b_min, b_max) = (other.min() + EPSILON, other.max() - EPSILON);

        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Contact test between the player and a ghost.
pub fn intersects(a_position: Vec2, a_size: Vec2, b_position: Vec2, b_size: Vec2) -> bool {
    Aabb::new(a_position, a_size).intersects(&Aabb::new(b_position, b_size))
}

/// Contact test used for coin and fruit pickups.
///
/// The collector's box is shrunk to [`PICKUP_SHRINK`] of its size so neighbouring tiles are
/// not collected early.
pub fn intersects_pickup(collector_position: Vec2, collector_size: Vec2, target_position: Vec2, target_size: Vec2) -> bool {
    Aabb::new(collector_position, collector_size)
        .scaled(PICKUP_SHRINK)
        .intersects(&Aabb::new(target_position, target_size))
}
