use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use observer::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod observer;
mod tile;
mod types;

/// Board shape and mine count, validated so that at least one tile is empty.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    width: Dimension,
    height: Dimension,
    mines: CellCount,
}

impl GameConfig {
    pub fn new(width: Dimension, height: Dimension, mines: CellCount) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(width, height) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self {
            width,
            height,
            mines,
        })
    }

    pub const fn width(&self) -> Dimension {
        self.width
    }

    pub const fn height(&self) -> Dimension {
        self.height
    }

    pub const fn size(&self) -> (Dimension, Dimension) {
        (self.width, self.height)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_tiles(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.mines
    }

    pub const fn contains(&self, location: Location) -> bool {
        location.x < self.width && location.y < self.height
    }
}

/// Immutable placement of mines over a board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    contents: Array2<TileContent>,
    mine_count: CellCount,
}

impl Minefield {
    /// Takes ownership of a `(height, width)` array in standard layout.
    pub(crate) fn from_contents(contents: Array2<TileContent>) -> Self {
        let mine_count = contents
            .iter()
            .filter(|content| content.is_mine())
            .count() as CellCount;
        Self {
            contents,
            mine_count,
        }
    }

    /// Builds a fixed layout, repeated locations count once.
    pub fn from_mine_locations(
        width: Dimension,
        height: Dimension,
        mines: &[Location],
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut contents = Array2::from_elem(
            (usize::from(height), usize::from(width)),
            TileContent::Empty,
        );
        for &location in mines {
            if location.x >= width || location.y >= height {
                return Err(GameError::InvalidCoords);
            }
            contents[location.to_nd_index()] = TileContent::Mine;
        }

        let minefield = Self::from_contents(contents);
        if minefield.mine_count >= minefield.total_tiles() {
            return Err(GameError::TooManyMines);
        }
        Ok(minefield)
    }

    pub fn game_config(&self) -> GameConfig {
        let (width, height) = self.size();
        GameConfig {
            width,
            height,
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> (Dimension, Dimension) {
        let (rows, cols) = self.contents.dim();
        (cols as Dimension, rows as Dimension)
    }

    pub fn contains(&self, location: Location) -> bool {
        let (width, height) = self.size();
        location.x < width && location.y < height
    }

    pub fn total_tiles(&self) -> CellCount {
        self.contents.len() as CellCount
    }

    pub fn safe_tiles(&self) -> CellCount {
        self.total_tiles() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, location: Location) -> bool {
        self[location].is_mine()
    }

    pub fn neighbors(&self, location: Location) -> Neighborhood {
        Neighborhood::adjacent(location, self.size())
    }

    pub fn adjacent_mine_count(&self, location: Location) -> u8 {
        self.neighbors(location)
            .filter(|&pos| self.contains_mine(pos))
            .count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Location> + '_ {
        let (width, _) = self.size();
        self.contents
            .iter()
            .enumerate()
            .filter(|(_, content)| content.is_mine())
            .map(move |(index, _)| Location::from_linear_index(index, width))
    }
}

impl Index<Location> for Minefield {
    type Output = TileContent;

    fn index(&self, location: Location) -> &Self::Output {
        &self.contents[location.to_nd_index()]
    }
}

/// Result of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether the board looks different after the move.
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Result of a reveal, ordered from least to most significant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Won,
    HitMine,
}

impl RevealOutcome {
    /// Whether the board looks different after the move.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Merging keeps the most significant outcome, a mine hit wins over everything.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.max(rhs)
    }
}
