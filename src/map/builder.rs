//! The maze: static tile grid, tile geometry and wall queries.

use std::fmt;

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::MapTile;
use crate::error::{GameResult, MapError, ParseError};
use crate::map::direction::Direction;
use crate::map::parser::{MapTileParser, ParsedMap};
use crate::systems::components::Ghost;

/// Directions an agent may take from a tile. Never more than four.
pub type LegalDirections = SmallVec<[Direction; 4]>;

/// The maze a level is played in.
///
/// Positions live in a normalized space spanning `[-1, 1]` on both axes, with y growing
/// downward. Tile sizes are derived from the grid dimensions so the maze exactly fills it.
#[derive(Resource, Debug, Clone)]
pub struct Maze {
    width: usize,
    height: usize,
    tiles: Vec<MapTile>,
    tile_size: Vec2,
    player_spawn: IVec2,
    ghost_spawns: Vec<(Ghost, IVec2)>,
}

impl Maze {
    /// Builds a maze from raw layout rows.
    pub fn new(raw_board: &[&str]) -> GameResult<Maze> {
        Ok(Self::from_parsed(MapTileParser::parse_board(raw_board)?))
    }

    /// Builds a maze from the contents of a map file.
    pub fn from_text(text: &str) -> Result<Maze, ParseError> {
        MapTileParser::parse_text(text).map(Self::from_parsed)
    }

    pub fn from_parsed(parsed: ParsedMap) -> Maze {
        let tile_size = Vec2::new(2.0 / parsed.width as f32, 2.0 / parsed.height as f32);
        debug!(
            width = parsed.width,
            height = parsed.height,
            ghosts = parsed.ghost_spawns.len(),
            "Maze built"
        );

        Maze {
            width: parsed.width,
            height: parsed.height,
            tiles: parsed.tiles,
            tile_size,
            player_spawn: parsed.player_spawn,
            ghost_spawns: parsed.ghost_spawns,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Size of a single tile in normalized units.
    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn player_spawn(&self) -> IVec2 {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> &[(Ghost, IVec2)] {
        &self.ghost_spawns
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        let in_bounds = tile.x >= 0 && tile.y >= 0 && (tile.x as usize) < self.width && (tile.y as usize) < self.height;
        in_bounds.then(|| tile.y as usize * self.width + tile.x as usize)
    }

    /// Returns the tile at the given grid coordinate.
    pub fn tile(&self, tile: IVec2) -> Result<MapTile, MapError> {
        self.index(tile)
            .map(|index| self.tiles[index])
            .ok_or(MapError::OutOfBounds { x: tile.x, y: tile.y })
    }

    /// Whether the tile blocks movement. Tiles outside the grid count as walls.
    pub fn is_wall(&self, tile: IVec2) -> bool {
        self.tile(tile).map_or(true, |tile| tile == MapTile::Wall)
    }

    /// Center of a tile in normalized space.
    pub fn tile_center(&self, tile: IVec2) -> Vec2 {
        Vec2::splat(-1.0) + tile.as_vec2() * self.tile_size + self.tile_size / 2.0
    }

    /// The tile containing a normalized position.
    pub fn tile_of(&self, position: Vec2) -> IVec2 {
        // Truncation, not flooring: positions never sit left of or above the maze.
        ((position + Vec2::ONE) / self.tile_size).as_ivec2()
    }

    /// Center of the tile containing a normalized position.
    pub fn grid_center(&self, position: Vec2) -> Vec2 {
        self.tile_center(self.tile_of(position))
    }

    /// Converts a normalized position into tile units.
    pub fn to_tile_space(&self, position: Vec2) -> Vec2 {
        (position + Vec2::ONE) / self.tile_size
    }

    /// Directions out of `tile` that are not walls, in `U, D, L, R` order.
    ///
    /// When more than one remains, the reverse of `current` is removed.
    pub fn legal_directions(&self, tile: IVec2, current: Option<Direction>) -> LegalDirections {
        let mut legal: LegalDirections = Direction::DIRECTIONS
            .into_iter()
            .filter(|direction| !self.is_wall(tile + direction.as_ivec2()))
            .collect();

        if legal.len() > 1 {
            if let Some(reverse) = current.map(Direction::opposite) {
                legal.retain(|direction| *direction != reverse);
            }
        }
        legal
    }

    /// Empties a coin or fruit tile once it has been collected.
    ///
    /// Returns `false` if the tile holds no pickup.
    pub fn clear_pickup(&mut self, tile: IVec2) -> bool {
        match self.index(tile) {
            Some(index) if matches!(self.tiles[index], MapTile::Coin | MapTile::Fruit) => {
                self.tiles[index] = MapTile::Empty;
                true
            }
            _ => false,
        }
    }

    /// Iterates all tiles with their grid coordinates, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (IVec2, MapTile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (IVec2::new((index % self.width) as i32, (index / self.width) as i32), *tile))
    }

    /// Grid coordinates of every wall.
    pub fn walls(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles().filter(|(_, tile)| *tile == MapTile::Wall).map(|(position, _)| position)
    }
}

/// Writes the maze back in the map file format, one row per line.
impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.width) {
            let line: String = row.iter().map(|tile| MapTileParser::tile_character(*tile)).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
