//! Grid transition engine for a 4×4 sliding-tile merge puzzle.
//!
//! The engine is pure: [`Grid::shift`] turns a board and a [`Direction`] into a
//! [`MoveResult`] without touching its input, and the only source of
//! randomness ([`Grid::with_random_tile`]) takes the RNG as an argument.
//! [`session::GameSession`] glues the pieces together for a front-end.
//!
//! ```
//! use pastel_2048::{Direction, Grid};
//!
//! let grid = Grid::from_values([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]).unwrap();
//! let result = grid.shift(Direction::Right);
//! assert!(result.changed);
//! assert_eq!(result.score_gained, 4);
//! assert_eq!(result.grid.values()[0], [0, 0, 0, 4]);
//! ```

pub mod history;
pub mod input;
mod moves;
pub mod session;
mod spawn;
pub mod store;

use std::{
    fmt::{self, Display},
    num::NonZeroU32,
};

use serde::{Deserialize, Serialize};

pub use moves::{reduce_row, Line, MoveResult};
pub use spawn::SPAWN_TWO_PROBABILITY;

/// Width and height of the board.
pub const SIZE: usize = 4;

/// A tile of this value (or higher) wins the game.
pub const WIN_VALUE: u32 = 2048;

/// Largest exponent accepted from numeric input (2^24 = 16777216).
pub const MAX_EXPONENT: u32 = 24;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("{value} at row {row}, column {col} is not 0 or a power of two from 2 to 2^24")]
    InvalidValue { row: usize, col: usize, value: u32 },
    #[error("tile exponent {0} is not between 1 and 31")]
    InvalidExponent(u32),
}

/// A 4×4 board stored row-major. `None` is an empty cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    nums: [Option<Tile>; SIZE * SIZE],
}

impl Grid {
    pub const EMPTY: Grid = Grid {
        nums: [None; SIZE * SIZE],
    };

    /// Build a grid from numeric cell values, `0` meaning empty.
    pub fn from_values(values: [[u32; SIZE]; SIZE]) -> Result<Self, GridError> {
        let mut nums = [None; SIZE * SIZE];
        for (row, line) in values.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let tile =
                    Tile::from_value(value).ok_or(GridError::InvalidValue { row, col, value })?;
                nums[row * SIZE + col] = Some(tile);
            }
        }
        Ok(Self { nums })
    }

    /// Numeric view of the board, `0` for empty cells.
    pub fn values(&self) -> [[u32; SIZE]; SIZE] {
        self.rows()
            .map(|row| row.map(|t| t.map_or(0, |t| t.as_u32())))
    }

    pub fn rows(&self) -> [[Option<Tile>; SIZE]; SIZE] {
        let mut rows = [[None; SIZE]; SIZE];
        for (i, tile) in self.nums.iter().enumerate() {
            rows[i / SIZE][i % SIZE] = *tile;
        }
        rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.nums[row * SIZE + col]
    }

    pub(crate) fn cell(&self, idx: usize) -> Option<Tile> {
        self.nums[idx]
    }

    pub(crate) fn set_cell(&mut self, idx: usize, tile: Option<Tile>) {
        self.nums[idx] = tile;
    }

    pub fn empty_count(&self) -> usize {
        self.nums.iter().filter(|t| t.is_none()).count()
    }

    /// Largest tile value on the board, `0` for an empty board.
    pub fn max(&self) -> u32 {
        self.nums
            .iter()
            .filter_map(|t| t.map(|t| t.as_u32()))
            .max()
            .unwrap_or(0)
    }

    /// True once no move in any direction could change the board.
    pub fn is_game_over(&self) -> bool {
        if self.nums.iter().any(|t| t.is_none()) {
            return false;
        }

        for row in 0..SIZE {
            for col in 0..SIZE - 1 {
                if self.get(row, col) == self.get(row, col + 1) {
                    return false;
                }
            }
        }

        for col in 0..SIZE {
            for row in 0..SIZE - 1 {
                if self.get(row, col) == self.get(row + 1, col) {
                    return false;
                }
            }
        }

        true
    }

    /// True if any tile has reached [`WIN_VALUE`]. Stateless: the caller
    /// decides how often to celebrate.
    pub fn has_won(&self) -> bool {
        self.nums.iter().flatten().any(|t| t.as_u32() >= WIN_VALUE)
    }

    fn print_row(f: &mut impl fmt::Write, row: &[Option<Tile>]) -> fmt::Result {
        for tile in row.iter() {
            match tile {
                Some(tile) => write!(f, "|{: ^6}", tile.as_u32())?,
                None => write!(f, "|{: ^6}", " ")?,
            }
        }
        Ok(())
    }
}

impl TryFrom<[[u32; SIZE]; SIZE]> for Grid {
    type Error = GridError;

    fn try_from(values: [[u32; SIZE]; SIZE]) -> Result<Self, Self::Error> {
        Grid::from_values(values)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows().iter() {
            Grid::print_row(f, row)?;
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

// which power of two. NonZero because two is the lowest
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tile(NonZeroU32);

impl Tile {
    pub const TWO: Tile = Tile(NonZeroU32::MIN);
    pub const FOUR: Tile = Tile::TWO.double();

    /// Highest exponent a `u32` value can hold. Merges stop growing here.
    pub const CEILING: u32 = 31;

    pub const fn double(&self) -> Tile {
        if self.0.get() >= Tile::CEILING {
            *self
        } else {
            Tile(self.0.saturating_add(1))
        }
    }

    /// `None` unless `value` is a power of two from 2 up to `2^MAX_EXPONENT`.
    pub fn from_value(value: u32) -> Option<Tile> {
        if value < 2 || !value.is_power_of_two() || value.trailing_zeros() > MAX_EXPONENT {
            return None;
        }
        NonZeroU32::new(value.trailing_zeros()).map(Tile)
    }

    pub fn from_exponent(exponent: u32) -> Option<Tile> {
        if exponent > Tile::CEILING {
            return None;
        }
        NonZeroU32::new(exponent).map(Tile)
    }

    pub fn as_u32(&self) -> u32 {
        2_u32.pow(self.0.get())
    }

    pub fn exponent(&self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Tile {
    type Error = GridError;

    fn try_from(exponent: u32) -> Result<Self, Self::Error> {
        Tile::from_exponent(exponent).ok_or(GridError::InvalidExponent(exponent))
    }
}

impl From<Tile> for u32 {
    fn from(tile: Tile) -> u32 {
        tile.exponent()
    }
}
