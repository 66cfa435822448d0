use serde::{Deserialize, Serialize};

/// What lies under a tile, fixed once the minefield is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileContent {
    Empty,
    Mine,
}

impl TileContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for TileContent {
    fn default() -> Self {
        Self::Empty
    }
}

/// Player-visible state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileStatus {
    Unknown,
    Flagged,
    Revealed,
    Exploded,
}

impl Default for TileStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    content: TileContent,
    status: TileStatus,
}

impl Tile {
    pub const fn new(content: TileContent, status: TileStatus) -> Self {
        Self { content, status }
    }

    pub const fn content(&self) -> TileContent {
        self.content
    }

    pub const fn status(&self) -> TileStatus {
        self.status
    }

    pub const fn is_mine(&self) -> bool {
        self.content.is_mine()
    }
}
