//! Neighbor-counting automata: birth/survival life rules, crystal growth, erosion, and
//! the strobe expand/contract pair.
//!
//! Every rule here reads the Moore neighborhood of the *input* grid and writes into a
//! fresh copy, so the result never depends on scan order.
use rand::Rng;

use crate::grid::{Color, Grid, EMPTY};
use crate::pattern::chance;
use crate::pattern::params::{CrystallizeParams, ErosionParams, LifeRule, StrobeParams};

/// Generic birth/survival step used by both `conway` and `tendrils`.
///
/// Newborn cells take the neighbor-majority color, or `fallback` when the rule lets a
/// cell be born with no colored neighbor.
pub fn life(grid: &Grid, rule: &LifeRule, fallback: Color) -> Grid {
    let mut out = grid.clone();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let hood = grid.neighborhood(row, col);
            let live = hood.live() as u8;
            if grid.get(row, col) != EMPTY {
                if !rule.survive.contains(&live) {
                    out.set(row, col, EMPTY);
                }
            } else if rule.born.contains(&live) {
                out.set(row, col, hood.majority().unwrap_or(fallback));
            }
        }
    }
    out
}

/// Empty cells take the first color (ascending) that occurs at least `threshold` times
/// around them.
pub fn crystallize(grid: &Grid, params: &CrystallizeParams) -> Grid {
    let threshold = params.threshold as usize;
    let mut out = grid.clone();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.get(row, col) != EMPTY {
                continue;
            }
            if let Some(color) = grid.neighborhood(row, col).first_reaching(threshold) {
                out.set(row, col, color);
            }
        }
    }
    out
}

/// Colored cells exposed on at least `solidity` sides erode with probability
/// `erosion_rate`. The grid edge counts as exposure.
pub fn erosion(grid: &Grid, params: &ErosionParams, rng: &mut dyn Rng) -> Grid {
    let solidity = params.solidity as usize;
    let mut out = grid.clone();
    for (row, col, _) in grid.colored_cells() {
        if !chance(rng, params.erosion_rate) {
            continue;
        }
        if grid.neighborhood(row, col).open() >= solidity {
            out.set(row, col, EMPTY);
        }
    }
    out
}

/// Alternates between [`expand`] and [`contract`], flipping `expanding` every call.
pub fn strobe(grid: &Grid, params: &StrobeParams, expanding: &mut bool) -> Grid {
    let out = if *expanding {
        expand(grid, params.expand_threshold as usize)
    } else {
        contract(grid, params.contract_threshold as usize)
    };
    *expanding = !*expanding;
    out
}

/// Fills empty cells with at least `threshold` colored neighbors with the majority color.
pub fn expand(grid: &Grid, threshold: usize) -> Grid {
    let mut out = grid.clone();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.get(row, col) != EMPTY {
                continue;
            }
            let hood = grid.neighborhood(row, col);
            if hood.live() >= threshold {
                if let Some(color) = hood.majority() {
                    out.set(row, col, color);
                }
            }
        }
    }
    out
}

/// Clears colored cells with at least `threshold` empty-or-outside neighbors.
pub fn contract(grid: &Grid, threshold: usize) -> Grid {
    let mut out = grid.clone();
    for (row, col, _) in grid.colored_cells() {
        if grid.neighborhood(row, col).open() >= threshold {
            out.set(row, col, EMPTY);
        }
    }
    out
}
