//! Tile model: a (shape, color) pair with a dense index in `[0, 36)`.

use std::fmt;

/// Number of distinct shapes and colors; the two axes of a tile.
pub const NUM_SHAPES: u8 = 6;
pub const NUM_COLORS: u8 = 6;

const SHAPE_NAMES: [&str; 6] = ["Circle", "Square", "Diamond", "Clover", "Star", "Starburst"];
const COLOR_NAMES: [&str; 6] = ["Red", "Orange", "Yellow", "Green", "Blue", "Purple"];

/// A single Qwirkle tile: a shape in `0..6` paired with a color in `0..6`.
///
/// Tiles are values, never aliased across entities — the bag, hands, and
/// board each hold their own copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub shape: u8,
    pub color: u8,
}

impl Tile {
    /// Builds a tile, panicking if either axis is out of range. Only used
    /// at the few sites that construct tiles from known-good constants
    /// (the bag's initial fill); everywhere else tiles are copied.
    pub const fn new(shape: u8, color: u8) -> Self {
        Tile { shape, color }
    }

    /// Dense index in `[0, 36)`, used as the array key for duplicate checks
    /// and the `36`-ary permutation hash.
    pub const fn index(&self) -> usize {
        (self.shape as usize) * (NUM_COLORS as usize) + self.color as usize
    }

    /// Reconstructs a tile from its dense index.
    pub const fn from_index(index: usize) -> Self {
        Tile {
            shape: (index / NUM_COLORS as usize) as u8,
            color: (index % NUM_COLORS as usize) as u8,
        }
    }

    /// All 36 unique tiles in index order.
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..36).map(Tile::from_index)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            COLOR_NAMES[self.color as usize], SHAPE_NAMES[self.shape as usize]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for t in Tile::all() {
            assert_eq!(Tile::from_index(t.index()), t);
        }
    }

    #[test]
    fn index_is_dense() {
        let indices: Vec<usize> = Tile::all().map(|t| t.index()).collect();
        assert_eq!(indices, (0..36).collect::<Vec<_>>());
    }

    #[test]
    fn display_names_first_and_last() {
        assert_eq!(Tile::new(0, 0).to_string(), "Red Circle");
        assert_eq!(Tile::new(5, 5).to_string(), "Purple Starburst");
    }
}
