//! Color-pushing patterns: each colored cell paints some of its neighbors.
use rand::Rng;

use crate::grid::{Grid, EMPTY, MOORE};
use crate::pattern::params::{DirectionalParams, PulseParams, RandomWalkParams};
use crate::pattern::{chance, shuffle};

/// With probability `spread_probability`, each colored cell pushes its color onto
/// `spread_count` distinct neighbors picked at random.
pub fn random_walk(
    grid: &Grid,
    spread_probability: f32,
    params: &RandomWalkParams,
    rng: &mut dyn Rng,
) -> Grid {
    let offsets = params.mode.offsets();
    let count = params.spread_count as usize;
    let mut out = grid.clone();
    let mut targets = Vec::with_capacity(offsets.len());
    for (row, col, color) in grid.colored_cells() {
        if !chance(rng, spread_probability) {
            continue;
        }
        targets.clear();
        targets.extend(grid.neighbors(row, col, offsets));
        shuffle(&mut targets, rng);
        for &(r, c) in targets.iter().take(count) {
            out.set(r, c, color);
        }
    }
    out
}

/// Like [`random_walk`], but each of the `spread_count` shuffled targets is replaced by
/// the bias neighbor with probability `bias_strength` when that neighbor exists.
pub fn directional(
    grid: &Grid,
    spread_probability: f32,
    params: &DirectionalParams,
    rng: &mut dyn Rng,
) -> Grid {
    let offsets = params.mode.offsets();
    let (bias_dr, bias_dc) = params.bias.offset();
    let count = params.spread_count as usize;
    let mut out = grid.clone();
    let mut targets = Vec::with_capacity(offsets.len());
    for (row, col, color) in grid.colored_cells() {
        if !chance(rng, spread_probability) {
            continue;
        }
        let bias = grid.offset(row, col, bias_dr, bias_dc);
        targets.clear();
        targets.extend(grid.neighbors(row, col, offsets));
        shuffle(&mut targets, rng);
        for &target in targets.iter().take(count) {
            let (r, c) = match bias {
                Some(cell) if chance(rng, params.bias_strength) => cell,
                _ => target,
            };
            out.set(r, c, color);
        }
    }
    out
}

/// Every colored cell stamps its color onto all 8 neighbors (only empty ones unless
/// `overtakes` is set).
///
/// The sweep starts at the edge opposite the travel direction and works on the output,
/// so freshly stamped cells stamp in turn and a front crosses the grid in one tick.
pub fn pulse(grid: &Grid, params: &PulseParams) -> Grid {
    let (dr, dc) = params.direction.offset();
    let rows = sweep_order(grid.rows(), dr);
    let cols = sweep_order(grid.cols(), dc);
    let mut out = grid.clone();
    let mut targets = Vec::with_capacity(MOORE.len());
    for &row in &rows {
        for &col in &cols {
            let color = out.get(row, col);
            if color == EMPTY {
                continue;
            }
            targets.clear();
            targets.extend(out.neighbors(row, col, &MOORE));
            for &(r, c) in &targets {
                if params.overtakes || out.get(r, c) == EMPTY {
                    out.set(r, c, color);
                }
            }
        }
    }
    out
}

/// Indices `0..len` ordered so the sweep travels along `step`.
fn sweep_order(len: usize, step: isize) -> Vec<usize> {
    if step < 0 {
        (0..len).rev().collect()
    } else {
        (0..len).collect()
    }
}
