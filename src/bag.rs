//! The tile bag: a 108-tile multiset (three copies of each of the 36 tiles)
//! with a seeded, reproducible shuffle.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::tile::Tile;

/// Copies of each unique tile in a fresh bag.
pub const COPIES_PER_TILE: usize = 3;
/// Total tile count in a fresh bag: `36 * 3`.
pub const TOTAL_TILES: usize = 36 * COPIES_PER_TILE;

/// A shuffled multiset of tiles plus the RNG that shuffles it.
///
/// The generator's state is fully determined by the initial seed plus the
/// sequence of draws and returns, so two bags built from the same seed and
/// driven by the same sequence of operations produce identical draws.
pub struct Bag {
    tiles: Vec<Tile>,
    rng: ChaCha8Rng,
}

impl Bag {
    /// Builds the full 108-tile multiset and Fisher–Yates shuffles it with
    /// a generator seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut tiles = Vec::with_capacity(TOTAL_TILES);
        for t in Tile::all() {
            for _ in 0..COPIES_PER_TILE {
                tiles.push(t);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        Bag { tiles, rng }
    }

    /// Removes and returns the first `min(n, remaining)` tiles.
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let n = n.min(self.tiles.len());
        self.tiles.split_off(self.tiles.len() - n)
    }

    /// Appends `tiles` back to the bag and fully reshuffles; the returned
    /// tiles become untraceable from tiles already present.
    pub fn return_tiles(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
        self.tiles.shuffle(&mut self.rng);
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Duplicates the current contents but reseeds the generator — used by
    /// the Monte Carlo estimator so each playout draws independently of the
    /// live game and of every other playout.
    pub fn clone_reseeded(&self, new_seed: u64) -> Self {
        Bag {
            tiles: self.tiles.clone(),
            rng: ChaCha8Rng::seed_from_u64(new_seed),
        }
    }
}

impl Clone for Bag {
    fn clone(&self) -> Self {
        Bag {
            tiles: self.tiles.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl std::fmt::Debug for Bag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bag").field("remaining", &self.tiles.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_bag_has_108_tiles_three_of_each() {
        let bag = Bag::new(42);
        assert_eq!(bag.remaining(), TOTAL_TILES);
        let mut counts = [0u32; 36];
        for t in &bag.tiles {
            counts[t.index()] += 1;
        }
        assert!(counts.iter().all(|&c| c == 3));
    }

    #[test]
    fn draw_and_return_conserves_total() {
        let mut bag = Bag::new(7);
        let drawn = bag.draw(6);
        assert_eq!(drawn.len(), 6);
        assert_eq!(bag.remaining(), TOTAL_TILES - 6);
        bag.return_tiles(drawn);
        assert_eq!(bag.remaining(), TOTAL_TILES);
    }

    #[test]
    fn draw_clamps_to_remaining() {
        let mut bag = Bag::new(1);
        let all = bag.draw(1000);
        assert_eq!(all.len(), TOTAL_TILES);
        assert!(bag.is_empty());
        assert_eq!(bag.draw(1).len(), 0);
    }

    #[test]
    fn same_seed_same_draw_sequence() {
        let mut a = Bag::new(99);
        let mut b = Bag::new(99);
        assert_eq!(a.draw(10), b.draw(10));
        a.return_tiles(vec![Tile::new(0, 0)]);
        b.return_tiles(vec![Tile::new(0, 0)]);
        assert_eq!(a.draw(5), b.draw(5));
    }

    #[test]
    fn clone_reseeded_keeps_contents_changes_future_draws() {
        let bag = Bag::new(5);
        let mut clone_a = bag.clone_reseeded(100);
        let mut clone_b = bag.clone_reseeded(200);
        assert_eq!(clone_a.remaining(), bag.remaining());
        // Different reseed should (overwhelmingly likely) diverge in future returns/reshuffles.
        clone_a.return_tiles(vec![]);
        clone_b.return_tiles(vec![]);
        assert_ne!(clone_a.tiles, clone_b.tiles);
    }
}
