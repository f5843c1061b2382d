use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use glam::IVec2;
use pacman_core::{
    constants::{MapTile, RAW_BOARD},
    error::ParseError,
    map::parser::{MapTileParser, ParsedMap},
    systems::Ghost,
};
use speculoos::prelude::*;

#[test]
fn test_parse_character() {
    let test_cases = [
        ('#', MapTile::Wall),
        ('0', MapTile::Coin),
        ('f', MapTile::Fruit),
        ('P', MapTile::PlayerSpawn),
        (' ', MapTile::Empty),
        ('R', MapTile::GhostSpawn(Ghost::Red)),
        ('I', MapTile::GhostSpawn(Ghost::Pink)),
        ('B', MapTile::GhostSpawn(Ghost::Blue)),
        ('O', MapTile::GhostSpawn(Ghost::Orange)),
    ];

    for (c, expected) in test_cases {
        assert_that(&MapTileParser::parse_character(c)).is_equal_to(Ok(expected));
        assert_that(&MapTileParser::tile_character(expected)).is_equal_to(c);
    }

    assert_that(&MapTileParser::parse_character('Z')).is_equal_to(Err(ParseError::UnknownCharacter('Z')));
}

#[test]
fn test_parse_board() {
    let parsed = MapTileParser::parse_board(&RAW_BOARD).unwrap();

    assert_that(&parsed.width).is_equal_to(21);
    assert_that(&parsed.height).is_equal_to(17);
    assert_that(&parsed.tiles.len()).is_equal_to(21 * 17);
    assert_that(&parsed.player_spawn).is_equal_to(IVec2::new(10, 9));
    assert_that(&parsed.ghost_spawns.len()).is_equal_to(4);
}

#[test]
fn test_parse_board_unknown_characters_become_empty() {
    let parsed = MapTileParser::parse_board(&["#####", "#P?0#", "#####"]).unwrap();

    assert_that(&parsed.tiles[7]).is_equal_to(MapTile::Empty);
    assert_that(&parsed.tiles[8]).is_equal_to(MapTile::Coin);
}

#[test]
fn test_parse_board_errors() {
    assert_that(&MapTileParser::parse_board(&[])).is_equal_to(Err(ParseError::EmptyMap));
    assert_that(&MapTileParser::parse_board(&[""])).is_equal_to(Err(ParseError::EmptyMap));
    assert_that(&MapTileParser::parse_board(&["###", "#0#", "###"])).is_equal_to(Err(ParseError::MissingPlayer));
    assert_that(&MapTileParser::parse_board(&["####", "#PP#", "####"])).is_equal_to(Err(ParseError::MultiplePlayers(2)));
    assert_that(&MapTileParser::parse_board(&["####", "#P#", "####"])).is_equal_to(Err(ParseError::RaggedRow {
        row: 1,
        expected: 4,
        found: 3,
    }));
}

#[test]
fn test_parse_text_handles_line_endings() {
    let unix = MapTileParser::parse_text("#####\n#P0f#\n#####\n\n").unwrap();
    let windows = MapTileParser::parse_text("#####\r\n#P0f#\r\n#####\r\n").unwrap();

    assert_that(&windows).is_equal_to(&unix);
    assert_that(&unix.height).is_equal_to(3);
    assert_that(&unix.tiles[8]).is_equal_to(MapTile::Fruit);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn parse_with_logs(rows: &[&str]) -> (ParsedMap, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let parsed = tracing::subscriber::with_default(subscriber, || MapTileParser::parse_board(rows).unwrap());
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    (parsed, output)
}

#[test]
fn test_whitespace_loads_empty_without_warning() {
    let (parsed, logs) = parse_with_logs(&["#####", "#P\t0#", "#####"]);

    assert_that(&parsed.tiles[7]).is_equal_to(MapTile::Empty);
    assert_that(&logs).does_not_contain("unrecognized");
}

#[test]
fn test_unknown_character_is_warned() {
    let (parsed, logs) = parse_with_logs(&["#####", "#P?0#", "#####"]);

    assert_that(&parsed.tiles[7]).is_equal_to(MapTile::Empty);
    assert_that(&logs).contains("Skipping unrecognized map tile");
}
