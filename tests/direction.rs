use glam::{IVec2, Vec2};
use pacman_core::map::direction::Direction;
use speculoos::prelude::*;

#[test]
fn test_from_char() {
    assert_that(&Direction::from_char('U')).is_equal_to(Some(Direction::Up));
    assert_that(&Direction::from_char('d')).is_equal_to(Some(Direction::Down));
    assert_that(&Direction::from_char('l')).is_equal_to(Some(Direction::Left));
    assert_that(&Direction::from_char('R')).is_equal_to(Some(Direction::Right));
    assert_that(&Direction::from_char('x')).is_none();
    assert_that(&Direction::from_char(' ')).is_none();
}

#[test]
fn test_char_round_trip() {
    for direction in Direction::DIRECTIONS {
        assert_that(&Direction::from_char(direction.as_char())).is_equal_to(Some(direction));
    }
}

#[test]
fn test_opposite() {
    for direction in Direction::DIRECTIONS {
        assert_that(&direction.opposite()).is_not_equal_to(direction);
        assert_that(&direction.opposite().opposite()).is_equal_to(direction);
        assert_that(&(direction.as_ivec2() + direction.opposite().as_ivec2())).is_equal_to(IVec2::ZERO);
    }
}

#[test]
fn test_vectors_point_down_the_rows() {
    assert_that(&Direction::Up.as_ivec2()).is_equal_to(IVec2::new(0, -1));
    assert_that(&Direction::Down.as_ivec2()).is_equal_to(IVec2::new(0, 1));
    assert_that(&Direction::Left.as_vec2()).is_equal_to(Vec2::new(-1.0, 0.0));
    assert_that(&IVec2::from(Direction::Right)).is_equal_to(IVec2::X);
}

#[test]
fn test_is_vertical() {
    assert_that(&Direction::Up.is_vertical()).is_true();
    assert_that(&Direction::Down.is_vertical()).is_true();
    assert_that(&Direction::Left.is_vertical()).is_false();
    assert_that(&Direction::Right.is_vertical()).is_false();
}

#[test]
fn test_names() {
    assert_that(&Direction::Up.as_ref()).is_equal_to("up");
    assert_that(&Direction::Right.as_ref()).is_equal_to("right");
}
