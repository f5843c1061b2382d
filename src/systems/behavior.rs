//! Direction choice for each ghost variant.
//!
//! Every strategy is handed the legal directions out of the ghost's tile (walls removed, and
//! the reverse removed whenever an alternative exists). Positions are in tile units.

use glam::Vec2;
use rand::{seq::IndexedRandom, Rng};
use smallvec::SmallVec;

use crate::map::direction::Direction;
use crate::systems::components::Ghost;

/// Distances closer than this are considered equal.
const TIE_EPSILON: f32 = 0.001;

/// What a ghost knows when it picks a direction.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub legal: &'a [Direction],
    /// The direction the ghost is currently locked to.
    pub current: Option<Direction>,
    pub ghost: Vec2,
    pub player: Vec2,
    pub player_facing: Option<Direction>,
}

impl Ghost {
    /// Chooses a direction from `context.legal`. `None` only when there are no legal moves.
    pub fn decide<R: Rng + ?Sized>(self, context: &DecisionContext, rng: &mut R) -> Option<Direction> {
        match self {
            Ghost::Red => locked_random(context, rng),
            // Blue ambushes exactly like Pink; it is only released later.
            Ghost::Pink | Ghost::Blue => {
                let ahead = context.player_facing.map_or(Vec2::ZERO, Direction::as_vec2);
                closest_to(context.ghost, context.player + ahead, context.legal, rng)
            }
            Ghost::Orange => closest_to(context.ghost, context.player, context.legal, rng),
        }
    }
}

/// Uniform choice among the legal directions.
pub fn random_direction<R: Rng + ?Sized>(legal: &[Direction], rng: &mut R) -> Option<Direction> {
    legal.choose(rng).copied()
}

/// Keeps going straight between intersections. At an intersection (two or more options, or
/// straight is no longer possible) a fair coin decides between a random pick and going straight.
fn locked_random<R: Rng + ?Sized>(context: &DecisionContext, rng: &mut R) -> Option<Direction> {
    let legal = context.legal;
    if legal.is_empty() {
        return None;
    }

    let straight = context.current.filter(|current| legal.contains(current));
    let intersection = legal.len() >= 2 || straight.is_none();

    if !intersection {
        return straight.or_else(|| legal.first().copied());
    }

    if rng.random_bool(0.5) {
        random_direction(legal, rng)
    } else {
        straight.or_else(|| random_direction(legal, rng))
    }
}

/// The legal direction whose one-tile step lands closest (Manhattan) to `target`.
/// Ties are broken uniformly at random.
fn closest_to<R: Rng + ?Sized>(from: Vec2, target: Vec2, legal: &[Direction], rng: &mut R) -> Option<Direction> {
    let mut best_distance = f32::MAX;
    let mut best: SmallVec<[Direction; 4]> = SmallVec::new();

    for &direction in legal {
        let next = from + direction.as_vec2();
        let distance = (next.x - target.x).abs() + (next.y - target.y).abs();

        if distance < best_distance - TIE_EPSILON {
            best_distance = distance;
            best.clear();
            best.push(direction);
        } else if (distance - best_distance).abs() < TIE_EPSILON {
            best.push(direction);
        }
    }

    random_direction(&best, rng).or_else(|| legal.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn closest_prefers_smaller_manhattan_distance() {
        let mut rng = SmallRng::seed_from_u64(7);
        let legal = [Direction::Up, Direction::Left, Direction::Right];
        let choice = closest_to(Vec2::new(5.0, 5.0), Vec2::new(9.0, 5.0), &legal, &mut rng);
        assert_eq!(choice, Some(Direction::Right));
    }

    #[test]
    fn closest_breaks_ties_within_candidates() {
        let legal = [Direction::Up, Direction::Right];
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let choice = closest_to(Vec2::new(0.0, 5.0), Vec2::new(5.0, 0.0), &legal, &mut rng);
            assert!(matches!(choice, Some(Direction::Up | Direction::Right)));
        }
    }
}
