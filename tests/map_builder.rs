use glam::{IVec2, Vec2};
use pacman_core::{
    constants::{MapTile, BOARD_HEIGHT, RAW_BOARD},
    error::MapError,
    map::{builder::Maze, direction::Direction},
    systems::Ghost,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

use common::{approx_eq, create_test_maze, CROSSROADS, L_CORRIDOR};

#[test]
fn test_builtin_maze_dimensions() {
    let maze = create_test_maze(&RAW_BOARD);

    assert_that(&maze.width()).is_equal_to(21);
    assert_that(&maze.height()).is_equal_to(BOARD_HEIGHT);
    assert_that(&maze.player_spawn()).is_equal_to(IVec2::new(10, 9));
    assert_that(&maze.tile_size()).is_equal_to(Vec2::new(2.0 / 21.0, 2.0 / 17.0));
}

#[test]
fn test_builtin_ghost_spawns_in_reading_order() {
    let maze = create_test_maze(&RAW_BOARD);

    assert_eq!(
        maze.ghost_spawns(),
        &[
            (Ghost::Red, IVec2::new(8, 7)),
            (Ghost::Pink, IVec2::new(9, 7)),
            (Ghost::Blue, IVec2::new(11, 7)),
            (Ghost::Orange, IVec2::new(12, 7)),
        ]
    );
}

#[test]
fn test_builtin_maze_item_counts() {
    let maze = create_test_maze(&RAW_BOARD);

    let coins = maze.tiles().filter(|(_, tile)| *tile == MapTile::Coin).count();
    let fruits = maze.tiles().filter(|(_, tile)| *tile == MapTile::Fruit).count();
    assert_that(&coins).is_equal_to(151);
    assert_that(&fruits).is_equal_to(4);
}

#[test]
fn test_tile_geometry_round_trips() {
    let maze = create_test_maze(&RAW_BOARD);

    for (tile, _) in maze.tiles() {
        let center = maze.tile_center(tile);
        assert_that(&maze.tile_of(center)).is_equal_to(tile);
        assert_that(&approx_eq(maze.grid_center(center + maze.tile_size() * 0.3), center)).is_true();
    }
}

#[test]
fn test_tiles_fill_normalized_space() {
    let maze = create_test_maze(&RAW_BOARD);
    let size = maze.tile_size();

    assert_that(&approx_eq(maze.tile_center(IVec2::ZERO), Vec2::splat(-1.0) + size / 2.0)).is_true();
    let last = IVec2::new(maze.width() as i32 - 1, maze.height() as i32 - 1);
    assert_that(&approx_eq(maze.tile_center(last), Vec2::ONE - size / 2.0)).is_true();
}

#[test]
fn test_tile_space_conversion() {
    let maze = create_test_maze(&RAW_BOARD);
    let tile_space = maze.to_tile_space(maze.tile_center(IVec2::new(4, 7)));

    assert_that(&approx_eq(tile_space, Vec2::new(4.5, 7.5))).is_true();
}

#[test]
fn test_out_of_bounds_is_wall() {
    let maze = create_test_maze(&L_CORRIDOR);

    for tile in [IVec2::new(-1, 0), IVec2::new(0, -1), IVec2::new(5, 1), IVec2::new(1, 4)] {
        assert_that(&maze.is_wall(tile)).is_true();
    }
    assert_that(&maze.tile(IVec2::new(5, 1))).is_equal_to(Err(MapError::OutOfBounds { x: 5, y: 1 }));
    assert_that(&maze.tile(IVec2::new(1, 1))).is_equal_to(Ok(MapTile::PlayerSpawn));
}

#[test]
fn test_walls_lists_every_wall() {
    let maze = create_test_maze(&L_CORRIDOR);
    let walls = maze.walls().count();
    let expected: usize = L_CORRIDOR.iter().map(|row| row.matches('#').count()).sum();

    assert_that(&walls).is_equal_to(expected);
}

#[test]
fn test_legal_directions_drop_reverse_at_junction() {
    let maze = create_test_maze(&CROSSROADS);
    let junction = IVec2::new(2, 2);

    assert_that(&maze.legal_directions(junction, None).to_vec())
        .is_equal_to(vec![Direction::Up, Direction::Down, Direction::Left, Direction::Right]);
    assert_that(&maze.legal_directions(junction, Some(Direction::Right)).to_vec())
        .is_equal_to(vec![Direction::Up, Direction::Down, Direction::Right]);
}

#[test]
fn test_legal_directions_keep_reverse_in_dead_end() {
    let maze = create_test_maze(&CROSSROADS);

    assert_that(&maze.legal_directions(IVec2::new(2, 1), Some(Direction::Up)).to_vec())
        .is_equal_to(vec![Direction::Down]);
}

#[test]
fn test_display_round_trips() {
    let maze = create_test_maze(&RAW_BOARD);
    let text = maze.to_string();

    let expected: String = RAW_BOARD.iter().map(|row| format!("{row}\n")).collect();
    assert_eq!(text, expected);

    let reparsed = Maze::from_text(&text).unwrap();
    assert_eq!(reparsed.to_string(), text);
    assert_that(&reparsed.player_spawn()).is_equal_to(maze.player_spawn());
}

#[test]
fn test_clear_pickup_only_empties_pickups() {
    let mut maze = create_test_maze(&["######", "#P0f #", "######"]);

    assert_that(&maze.clear_pickup(IVec2::new(2, 1))).is_true();
    assert_that(&maze.clear_pickup(IVec2::new(3, 1))).is_true();
    assert_that(&maze.clear_pickup(IVec2::new(2, 1))).is_false();
    assert_that(&maze.clear_pickup(IVec2::new(0, 0))).is_false();
    assert_that(&maze.clear_pickup(IVec2::new(1, 1))).is_false();
    assert_that(&maze.clear_pickup(IVec2::new(-1, 9))).is_false();

    assert_eq!(maze.to_string(), "######\n#P   #\n######\n");
}
