use core::fmt;
use serde::{Deserialize, Serialize};

/// Single axis used for board width, height, and positions.
pub type Dimension = u16;

/// Count type used for mine counts and total-tile counts.
pub type CellCount = u32;

pub const fn mult(a: Dimension, b: Dimension) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Position of a tile on the board, `x` grows to the right and `y` downwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: Dimension,
    pub y: Dimension,
}

impl Location {
    pub const fn new(x: Dimension, y: Dimension) -> Self {
        Self { x, y }
    }

    /// Linear index in a row-major board of the given width.
    pub const fn linear_index(self, width: Dimension) -> usize {
        self.x as usize + width as usize * self.y as usize
    }

    /// Inverse of [`Location::linear_index`].
    pub const fn from_linear_index(index: usize, width: Dimension) -> Self {
        let width = width as usize;
        Self {
            x: (index % width) as Dimension,
            y: (index / width) as Dimension,
        }
    }
}

impl From<(Dimension, Dimension)> for Location {
    fn from((x, y): (Dimension, Dimension)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Boards are stored as `(height, width)` arrays so the standard layout matches `x + width * y`.
impl ToNdIndex for Location {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

/// Iterates the tiles within `radius` of a centre, clipped to the board and excluding the centre.
///
/// Yields in row-major order, which keeps flood fill and chording notifications reproducible.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    center: Location,
    left: Dimension,
    right: Dimension,
    bottom: Dimension,
    cursor: Option<Location>,
}

impl Neighborhood {
    pub fn new(center: Location, radius: Dimension, bounds: (Dimension, Dimension)) -> Self {
        let (width, height) = bounds;
        let left = center.x.saturating_sub(radius);
        let top = center.y.saturating_sub(radius);
        let right = center.x.saturating_add(radius).min(width.saturating_sub(1));
        let bottom = center.y.saturating_add(radius).min(height.saturating_sub(1));

        Self {
            center,
            left,
            right,
            bottom,
            cursor: (width > 0 && height > 0).then_some(Location::new(left, top)),
        }
    }

    /// Immediate neighbors, up to 8 of them.
    pub fn adjacent(center: Location, bounds: (Dimension, Dimension)) -> Self {
        Self::new(center, 1, bounds)
    }

    fn advance(&mut self) -> Option<Location> {
        let current = self.cursor?;
        self.cursor = if current.x < self.right {
            Some(Location::new(current.x + 1, current.y))
        } else if current.y < self.bottom {
            Some(Location::new(self.left, current.y + 1))
        } else {
            None
        };
        Some(current)
    }
}

impl Iterator for Neighborhood {
    type Item = Location;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next_item = self.advance()?;
            if next_item != self.center {
                return Some(next_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(center: (Dimension, Dimension), radius: Dimension, bounds: (Dimension, Dimension)) -> Vec<Location> {
        Neighborhood::new(center.into(), radius, bounds).collect()
    }

    #[test]
    fn interior_tile_has_eight_neighbors_in_row_major_order() {
        let neighbors = collect((1, 1), 1, (3, 3));

        let expected: Vec<Location> = [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
            .into_iter()
            .map(|(x, y)| Location::new(x, y))
            .collect();
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn corner_and_edge_tiles_are_clipped() {
        assert_eq!(collect((0, 0), 1, (5, 5)).len(), 3);
        assert_eq!(collect((4, 4), 1, (5, 5)).len(), 3);
        assert_eq!(collect((2, 0), 1, (5, 5)).len(), 5);
        assert_eq!(collect((0, 2), 1, (5, 5)).len(), 5);
    }

    #[test]
    fn single_tile_board_has_no_neighbors() {
        assert!(collect((0, 0), 1, (1, 1)).is_empty());
    }

    #[test]
    fn radius_widens_the_neighborhood() {
        assert_eq!(collect((2, 2), 2, (5, 5)).len(), 24);
        assert!(collect((2, 2), 0, (5, 5)).is_empty());
    }

    #[test]
    fn linear_index_is_row_major() {
        let location = Location::new(3, 2);

        assert_eq!(location.linear_index(5), 13);
        assert_eq!(Location::from_linear_index(13, 5), location);
        assert_eq!(location.to_string(), "(3, 2)");
    }
}
