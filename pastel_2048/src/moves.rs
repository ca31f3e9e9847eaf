use log::trace;

use crate::{Direction, Grid, Tile, SIZE};

/// One row or column, ordered so that index 0 is the edge tiles slide toward.
pub type Line = [Option<Tile>; SIZE];

/// Outcome of sliding a grid, before any tile is spawned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    pub score_gained: u32,
    /// True iff at least one cell differs from the input grid.
    pub changed: bool,
}

/// Slide every tile toward index 0 and merge equal neighbours.
///
/// A tile produced by a merge is never merged again in the same pass, so
/// `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`. Returns the new line and the sum of
/// the merged values.
pub fn reduce_row(line: Line) -> (Line, u32) {
    let mut out = [None; SIZE];
    let mut len = 0;
    let mut score: u32 = 0;
    let mut pending: Option<Tile> = None;

    for tile in line.into_iter().flatten() {
        match pending.take() {
            Some(prev) if prev == tile => {
                let merged = prev.double();
                score = score.saturating_add(merged.as_u32());
                out[len] = Some(merged);
                len += 1;
            }
            Some(prev) => {
                out[len] = Some(prev);
                len += 1;
                pending = Some(tile);
            }
            None => pending = Some(tile),
        }
    }
    if let Some(last) = pending {
        out[len] = Some(last);
    }

    (out, score)
}

/// How a direction's lines are read out of the row-major cell array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Transform {
    Identity,
    Reverse,
    Transpose,
    TransposeReverse,
}

impl Transform {
    // (step along a line, step between lines, first cell)
    const fn strides(self) -> (i32, i32, i32) {
        match self {
            Transform::Identity => (1, 4, 0),
            Transform::Reverse => (-1, 4, 3),
            Transform::Transpose => (4, 1, 0),
            Transform::TransposeReverse => (-4, 1, 12),
        }
    }

    /// Cell indices of every line, each ordered toward the edge being slid into.
    fn lines(self) -> [[usize; SIZE]; SIZE] {
        let (dperp, dpar, start) = self.strides();
        let mut lines = [[0; SIZE]; SIZE];
        for (par_idx, line) in lines.iter_mut().enumerate() {
            let s = start + par_idx as i32 * dpar;
            for (perp_idx, cell) in line.iter_mut().enumerate() {
                *cell = (s + perp_idx as i32 * dperp) as usize;
            }
        }
        lines
    }
}

impl Direction {
    const fn transform(self) -> Transform {
        match self {
            Direction::Left => Transform::Identity,
            Direction::Right => Transform::Reverse,
            Direction::Up => Transform::Transpose,
            Direction::Down => Transform::TransposeReverse,
        }
    }
}

impl Grid {
    /// Slide and merge every line toward `direction`. `self` is left untouched.
    pub fn shift(&self, direction: Direction) -> MoveResult {
        let mut grid = *self;
        let mut score_gained: u32 = 0;

        for indices in direction.transform().lines() {
            let line = indices.map(|idx| self.cell(idx));
            let (reduced, score) = reduce_row(line);
            for (idx, tile) in indices.into_iter().zip(reduced) {
                grid.set_cell(idx, tile);
            }
            score_gained = score_gained.saturating_add(score);
        }

        let changed = grid != *self;
        trace!("shift {direction:?}: changed={changed} score={score_gained}");

        MoveResult {
            grid,
            score_gained,
            changed,
        }
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        self.shift(direction).changed
    }
}
