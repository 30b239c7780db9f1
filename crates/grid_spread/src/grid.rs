//! The shared mutable state driven by every pattern: a fixed-size matrix of color indices.
//!
//! This module defines [`Grid`] together with the neighborhood offset tables and the
//! [`Neighborhood`] survey used by the neighbor-counting automata.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Palette index stored in a cell. `0` is the empty background.
pub type Color = u8;

/// The background value of an empty cell.
pub const EMPTY: Color = 0;

/// 8-connected Moore neighborhood in row-major visiting order.
pub const MOORE: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 4-connected neighborhood in row-major visiting order.
pub const CARDINAL: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Rectangular matrix of palette indices stored in row-major order.
///
/// Dimensions never change after construction; resizing produces a new grid via
/// [`Grid::resized`]. Out-of-bounds neighbors are simply absent (no wraparound).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Creates an empty grid of the given size.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![EMPTY; rows * cols],
        }
    }

    /// Builds a grid from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(row_count * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidGrid(format!(
                    "row {index} has {} cells, expected {cols}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` when the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Color {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, color: Color) {
        let index = self.index(row, col);
        self.cells[index] = color;
    }

    /// Returns `true` if the signed coordinate lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Applies an offset to a cell, returning the target if it is in bounds.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let r = row as isize + dr;
        let c = col as isize + dc;
        self.in_bounds(r, c).then_some((r as usize, c as usize))
    }

    /// Iterates the in-bounds neighbors of a cell for the given offset table.
    pub fn neighbors<'a>(
        &'a self,
        row: usize,
        col: usize,
        offsets: &'a [(isize, isize)],
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        offsets
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(row, col, dr, dc))
    }

    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Color] {
        &mut self.cells
    }

    /// Iterates all colored cells in row-major order as `(row, col, color)`.
    pub fn colored_cells(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != EMPTY)
            .map(move |(i, &c)| (i / cols, i % cols, c))
    }

    pub fn colored_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Distinct non-empty colors present, ascending.
    pub fn colors(&self) -> Vec<Color> {
        let mut seen = [false; Color::MAX as usize + 1];
        for &c in &self.cells {
            seen[c as usize] = true;
        }
        (1..=Color::MAX).filter(|&c| seen[c as usize]).collect()
    }

    /// Copies the grid into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[Color]>::to_vec).collect()
    }

    /// Resets every cell to [`EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Returns a new grid of the requested size with the old contents copied
    /// top-left aligned and the remainder zero-filled.
    pub fn resized(&self, rows: usize, cols: usize) -> Grid {
        let mut out = Grid::new(rows, cols);
        for r in 0..rows.min(self.rows) {
            for c in 0..cols.min(self.cols) {
                out.set(r, c, self.get(r, c));
            }
        }
        out
    }

    /// Collects the colors of the 8 surrounding cells.
    pub fn neighborhood(&self, row: usize, col: usize) -> Neighborhood {
        let mut hood = Neighborhood::default();
        for (r, c) in self.neighbors(row, col, &MOORE) {
            let color = self.get(r, c);
            if color != EMPTY {
                hood.colors[hood.live] = color;
                hood.live += 1;
            }
        }
        hood
    }
}

/// Colors found in the Moore neighborhood of one cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighborhood {
    colors: [Color; 8],
    live: usize,
}

impl Neighborhood {
    /// Number of colored neighbors.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of neighbors that are empty or fall outside the grid.
    pub fn open(&self) -> usize {
        8 - self.live
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors[..self.live]
    }

    /// Most frequent neighbor color; ties go to the smaller index.
    pub fn majority(&self) -> Option<Color> {
        let mut best: Option<(Color, usize)> = None;
        for (color, count) in self.runs() {
            if best.is_none_or(|(_, n)| count > n) {
                best = Some((color, count));
            }
        }
        best.map(|(color, _)| color)
    }

    /// First color, scanning ascending, whose occurrence count reaches `threshold`.
    pub fn first_reaching(&self, threshold: usize) -> Option<Color> {
        self.runs()
            .find(|&(_, count)| count >= threshold)
            .map(|(color, _)| color)
    }

    /// `(color, count)` pairs in ascending color order.
    fn runs(&self) -> impl Iterator<Item = (Color, usize)> {
        let mut sorted = self.colors;
        sorted[..self.live].sort_unstable();
        let live = self.live;
        let mut i = 0;
        std::iter::from_fn(move || {
            if i >= live {
                return None;
            }
            let color = sorted[i];
            let start = i;
            while i < live && sorted[i] == color {
                i += 1;
            }
            Some((color, i - start))
        })
    }
}
