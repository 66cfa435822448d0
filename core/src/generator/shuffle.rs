use hashbrown::HashSet;
use ndarray::Array2;
use smallvec::SmallVec;

use super::*;

/// Places every mine at the front of the board and Fisher-Yates shuffles all but a reserved tail, which is then
/// swapped onto the excluded location and its neighborhood so the player's first move is safe.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
    excluded: Option<Location>,
    radius: Dimension,
}

impl ShuffleGenerator {
    pub fn new(seed: u64, excluded: Option<Location>, radius: Dimension) -> Self {
        Self {
            seed,
            excluded,
            radius,
        }
    }

    fn safe_set(&self, config: GameConfig) -> SmallVec<[Location; 9]> {
        let Some(excluded) = self.excluded else {
            return SmallVec::new();
        };

        let mut safe_set: SmallVec<[Location; 9]> = SmallVec::new();
        safe_set.push(excluded);
        safe_set.extend(Neighborhood::new(excluded, self.radius, config.size()));

        let total_tiles = config.total_tiles() as usize;
        if config.mines() as usize > total_tiles - safe_set.len() {
            log::warn!(
                "Cannot keep {} tiles around {} free of {} mines, only the start tile is kept safe",
                safe_set.len(),
                excluded,
                config.mines()
            );
            safe_set.truncate(1);
        }
        safe_set
    }
}

impl MinefieldGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        use rand::prelude::*;

        let (width, height) = config.size();
        let total_tiles = config.total_tiles() as usize;
        let mines = config.mines() as usize;
        let safe_set = self.safe_set(config);
        let end = total_tiles - safe_set.len();

        let mut contents = Array2::from_elem(
            (usize::from(height), usize::from(width)),
            TileContent::Empty,
        );
        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let tiles = contents.as_slice_mut().expect("layout should be standard");
            tiles[..mines].fill(TileContent::Mine);

            for i in 0..end {
                let j = rng.random_range(i..end);
                tiles.swap(i, j);
            }

            // the reserved tail holds only empty tiles whenever mines <= end
            let safe_indices: HashSet<usize> = safe_set
                .iter()
                .map(|location| location.linear_index(width))
                .collect();
            let mut free_slots = (end..total_tiles)
                .rev()
                .filter(|slot| !safe_indices.contains(slot));
            for location in &safe_set {
                let index = location.linear_index(width);
                if index >= end {
                    continue;
                }
                let Some(slot) = free_slots.next() else {
                    break;
                };
                tiles.swap(index, slot);
            }
        }

        let minefield = Minefield::from_contents(contents);
        if minefield.mine_count() != config.mines() {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                minefield.mine_count(),
                config.mines()
            );
        }
        log::debug!(
            "Generated {}x{} minefield with {} mines, safe around {:?}",
            width,
            height,
            minefield.mine_count(),
            self.excluded
        );
        minefield
    }
}
