use log::debug;
use rand::Rng;
use rand_distr::{Distribution, StandardUniform};

use crate::{Grid, Tile, SIZE};

/// Chance that a spawned tile is a 2 rather than a 4.
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

impl Distribution<Tile> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Tile {
        if rng.random_bool(SPAWN_TWO_PROBABILITY) {
            Tile::TWO
        } else {
            Tile::FOUR
        }
    }
}

impl Grid {
    /// An empty board with two random tiles, as at the start of a game.
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Grid {
        Grid::EMPTY.with_random_tile(rng).with_random_tile(rng)
    }

    /// `(row, col)` of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE * SIZE)
            .filter(|&i| self.cell(i).is_none())
            .map(|i| (i / SIZE, i % SIZE))
            .collect()
    }

    /// Place a 2 (90%) or a 4 (10%) on a uniformly chosen empty cell.
    ///
    /// A full grid comes back unchanged; occupied cells are never overwritten.
    pub fn with_random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let open = self.empty_cells();
        if open.is_empty() {
            debug!("no empty cell to spawn into");
            return *self;
        }

        let (row, col) = open[rng.random_range(0..open.len())];
        let tile: Tile = rng.random();

        let mut grid = *self;
        grid.set_cell(row * SIZE + col, Some(tile));
        grid
    }
}

/// Yields the same word forever. Zero always picks the first empty cell and a 2.
#[cfg(test)]
pub(crate) struct ConstRng(pub(crate) u64);

#[cfg(test)]
impl rand::RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (i, b) in dst.iter_mut().enumerate() {
            *b = self.0.to_le_bytes()[i % 8];
        }
    }
}
