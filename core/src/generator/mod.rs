use crate::*;
pub use shuffle::*;

mod shuffle;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield;
}

/// Radius of the safe zone kept around the first tile the player acts on.
pub const DEFAULT_SAFE_RADIUS: Dimension = 1;
