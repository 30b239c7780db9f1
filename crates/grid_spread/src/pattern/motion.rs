//! Patterns that move existing colors around instead of creating new cells:
//! scramble, jitter, flow and vortex.
use rand::Rng;

use crate::grid::{Color, Grid, EMPTY, MOORE};
use crate::pattern::params::{FlowParams, JitterParams, ScrambleParams, VortexParams};
use crate::pattern::{chance, rand_index};

/// Ring around a center cell, clockwise from the top-left corner.
pub const RING: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

/// Swaps the colors of `min(swap_count, colored / 2)` disjoint pairs of colored cells.
pub fn scramble(grid: &Grid, params: &ScrambleParams, rng: &mut dyn Rng) -> Grid {
    let mut out = grid.clone();
    let mut colored: Vec<usize> = grid
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c != EMPTY)
        .map(|(i, _)| i)
        .collect();
    if colored.len() < 2 {
        return out;
    }

    let picks = params.swap_count.min(colored.len() / 2) * 2;
    // Partial Fisher-Yates: the first `picks` entries become a uniform distinct sample.
    for i in 0..picks {
        let j = i + rand_index(rng, colored.len() - i);
        colored.swap(i, j);
    }
    let cells = out.cells_mut();
    for pair in colored[..picks].chunks_exact(2) {
        cells.swap(pair[0], pair[1]);
    }
    out
}

/// Each colored cell, with probability `jitter_chance`, moves into one random empty
/// neighbor.
///
/// Cells are visited row-major. The first mover to claim a destination keeps it; a later
/// mover aimed at the same cell is dropped while its source still empties.
pub fn jitter(grid: &Grid, params: &JitterParams, rng: &mut dyn Rng) -> Grid {
    let mut out = grid.clone();
    let mut claimed = vec![false; grid.cells().len()];
    let mut open = Vec::with_capacity(MOORE.len());
    for (row, col, color) in grid.colored_cells() {
        if !chance(rng, params.jitter_chance) {
            continue;
        }
        open.clear();
        open.extend(
            grid.neighbors(row, col, &MOORE)
                .filter(|&(r, c)| grid.get(r, c) == EMPTY),
        );
        if open.is_empty() {
            continue;
        }
        let (r, c) = open[rand_index(rng, open.len())];
        out.set(row, col, EMPTY);
        let dest = grid.index(r, c);
        if !claimed[dest] {
            claimed[dest] = true;
            out.set(r, c, color);
        }
    }
    out
}

/// Each colored cell, with probability `flow_chance`, steps one cell in the flow
/// direction when that cell is empty.
///
/// The sweep starts at the edge the flow is heading toward and works backwards against
/// it, operating on the output grid. A cell vacated by a move can be refilled by the cell
/// behind it in the same tick, so a packed column advances as a whole, while a cell that
/// just arrived is never moved twice.
pub fn flow(grid: &Grid, params: &FlowParams, rng: &mut dyn Rng) -> Grid {
    let (dr, dc) = params.direction.offset();
    let rows = against(grid.rows(), dr);
    let cols = against(grid.cols(), dc);
    let mut out = grid.clone();
    let mut claimed = vec![false; grid.cells().len()];
    for &row in &rows {
        for &col in &cols {
            let color = out.get(row, col);
            if color == EMPTY || claimed[out.index(row, col)] {
                continue;
            }
            if !chance(rng, params.flow_chance) {
                continue;
            }
            let Some((r, c)) = out.offset(row, col, dr, dc) else {
                continue;
            };
            let dest = out.index(r, c);
            if claimed[dest] || out.get(r, c) != EMPTY {
                continue;
            }
            claimed[dest] = true;
            out.set(row, col, EMPTY);
            out.set(r, c, color);
        }
    }
    out
}

/// Indices `0..len` ordered against `step`: descending when the flow moves toward
/// higher indices.
fn against(len: usize, step: isize) -> Vec<usize> {
    if step > 0 {
        (0..len).rev().collect()
    } else {
        (0..len).collect()
    }
}

/// Rotates `vortex_count` random interior 3x3 rings by one position clockwise. Later
/// picks operate on the result of earlier ones.
pub fn vortex(grid: &Grid, params: &VortexParams, rng: &mut dyn Rng) -> Grid {
    let mut out = grid.clone();
    if grid.rows() < 3 || grid.cols() < 3 {
        return out;
    }
    for _ in 0..params.vortex_count {
        let row = 1 + rand_index(rng, grid.rows() - 2);
        let col = 1 + rand_index(rng, grid.cols() - 2);
        rotate_ring(&mut out, row, col);
    }
    out
}

/// Rotates the 8 cells around an interior `(row, col)` one step clockwise: each ring
/// position takes the value of its counter-clockwise neighbor.
pub fn rotate_ring(grid: &mut Grid, row: usize, col: usize) {
    debug_assert!(row >= 1 && col >= 1 && row + 1 < grid.rows() && col + 1 < grid.cols());
    let at = |(dr, dc): (isize, isize)| ((row as isize + dr) as usize, (col as isize + dc) as usize);
    let ring: [Color; 8] = RING.map(|offset| {
        let (r, c) = at(offset);
        grid.get(r, c)
    });
    for (i, &offset) in RING.iter().enumerate() {
        let (r, c) = at(offset);
        grid.set(r, c, ring[(i + 7) % 8]);
    }
}
