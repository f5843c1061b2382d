//! Map parsing functionality for converting raw board layouts into structured data.

use glam::IVec2;
use tracing::warn;

use crate::constants::MapTile;
use crate::error::ParseError;
use crate::systems::components::Ghost;

/// Structured representation of a parsed board layout with its spawn markers extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMap {
    pub width: usize,
    pub height: usize,
    /// Row-major tiles, `width * height` long.
    pub tiles: Vec<MapTile>,
    /// Starting tile of the player (the single `P` in the layout).
    pub player_spawn: IVec2,
    /// Ghost spawn tiles in reading order (row by row, left to right).
    pub ghost_spawns: Vec<(Ghost, IVec2)>,
}

/// Parser for converting raw board layouts into structured map data.
pub struct MapTileParser;

impl MapTileParser {
    /// Converts a layout character into its tile.
    ///
    /// `#` wall, `0` coin, `f` fruit, `P` player spawn, `R`/`I`/`B`/`O` ghost spawns, space empty.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnknownCharacter` for any other character.
    pub fn parse_character(c: char) -> Result<MapTile, ParseError> {
        match c {
            '#' => Ok(MapTile::Wall),
            '0' => Ok(MapTile::Coin),
            'f' => Ok(MapTile::Fruit),
            'P' => Ok(MapTile::PlayerSpawn),
            ' ' => Ok(MapTile::Empty),
            _ => Ghost::from_char(c).map(MapTile::GhostSpawn).ok_or(ParseError::UnknownCharacter(c)),
        }
    }

    /// The layout character for a tile. Inverse of [`MapTileParser::parse_character`].
    pub fn tile_character(tile: MapTile) -> char {
        match tile {
            MapTile::Wall => '#',
            MapTile::Coin => '0',
            MapTile::Fruit => 'f',
            MapTile::PlayerSpawn => 'P',
            MapTile::Empty => ' ',
            MapTile::GhostSpawn(ghost) => ghost.as_char(),
        }
    }

    /// Parses a map file's contents. Line endings may be `\n` or `\r\n`; trailing blank lines are ignored.
    pub fn parse_text(text: &str) -> Result<ParsedMap, ParseError> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.trim_end_matches('\r').is_empty()) {
            lines.pop();
        }
        Self::parse_board(&lines)
    }

    /// Parses a raw board layout into structured map data.
    ///
    /// Unknown characters are logged and loaded as empty tiles. Whitespace other than a space
    /// loads as empty without a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is empty, its rows differ in width, or it does not
    /// contain exactly one player spawn.
    pub fn parse_board(raw_board: &[&str]) -> Result<ParsedMap, ParseError> {
        let rows: Vec<Vec<char>> = raw_board
            .iter()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ParseError::EmptyMap);
        }

        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut players = Vec::new();
        let mut ghost_spawns = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }

            for (x, &character) in row.iter().enumerate() {
                let position = IVec2::new(x as i32, y as i32);
                let tile = match Self::parse_character(character) {
                    Ok(tile) => tile,
                    Err(_) if character.is_whitespace() => MapTile::Empty,
                    Err(error) => {
                        warn!(x, y, %error, "Skipping unrecognized map tile");
                        MapTile::Empty
                    }
                };

                match tile {
                    MapTile::PlayerSpawn => players.push(position),
                    MapTile::GhostSpawn(ghost) => ghost_spawns.push((ghost, position)),
                    _ => {}
                }
                tiles.push(tile);
            }
        }

        let player_spawn = match players.as_slice() {
            [] => return Err(ParseError::MissingPlayer),
            [single] => *single,
            many => return Err(ParseError::MultiplePlayers(many.len())),
        };

        Ok(ParsedMap {
            width,
            height,
            tiles,
            player_spawn,
            ghost_spawns,
        })
    }
}
