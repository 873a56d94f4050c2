//! A player's hand: an ordered, capacity-6 container of tiles.

use crate::bag::Bag;
use crate::tile::Tile;

/// Maximum tiles a hand may hold at once.
pub const HAND_CAPACITY: usize = 6;

/// Ordered sequence of at most [`HAND_CAPACITY`] tiles. Ordering is
/// preserved across non-removing operations so that external 1-based slot
/// indices stay stable between observations.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new() -> Self {
        Hand { tiles: Vec::with_capacity(HAND_CAPACITY) }
    }

    /// Appends tiles up to capacity; any excess is silently dropped.
    pub fn add(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        for t in tiles {
            if self.tiles.len() >= HAND_CAPACITY {
                break;
            }
            self.tiles.push(t);
        }
    }

    /// Removes and returns the tile at 0-based `index`, or `None` if out of
    /// range.
    pub fn remove(&mut self, index: usize) -> Option<Tile> {
        if index < self.tiles.len() {
            Some(self.tiles.remove(index))
        } else {
            None
        }
    }

    /// Removes the tiles at `indices`, returning them in the same order as
    /// `indices`. Internally sorts a descending copy first so earlier
    /// removals don't shift the positions later removals need.
    pub fn remove_multiple(&mut self, indices: &[usize]) -> Vec<Tile> {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        let mut removed_by_index = std::collections::HashMap::new();
        for &i in &sorted {
            if let Some(t) = self.remove(i) {
                removed_by_index.insert(i, t);
            }
        }
        indices
            .iter()
            .filter_map(|i| removed_by_index.get(i).copied())
            .collect()
    }

    /// Draws from `bag` until the hand is back to full capacity.
    pub fn refill(&mut self, bag: &mut Bag) {
        let need = HAND_CAPACITY.saturating_sub(self.tiles.len());
        if need > 0 {
            self.add(bag.draw(need));
        }
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles.contains(&tile)
    }

    pub fn index_of(&self, tile: Tile) -> Option<usize> {
        self.tiles.iter().position(|&t| t == tile)
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Borrows the hand's tiles for hot-path iteration without copying.
    pub fn tiles_unsafe(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }
}
