//! Particle growth: walkers wander or home in on colored cells, painting a trail and
//! occasionally branching.
use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::events::{EventSink, SpreadEvent};
use crate::grid::{Color, Grid};
use crate::pattern::params::VeinParams;
use crate::pattern::{chance, rand_index};

/// Maximum walker population. Oldest walkers are kept when the cap is exceeded.
pub const WALKER_CAP: usize = 200;

/// Share of colored cells that receive a walker when the population is seeded.
pub const SEED_FRACTION: f32 = 0.1;

/// A mobile painter. `position.x` is the column, `position.y` the row.
#[derive(Clone, Debug, PartialEq)]
pub struct Walker {
    pub position: Vec2,
    pub color: Color,
}

impl Walker {
    pub fn new(row: usize, col: usize, color: Color) -> Self {
        Self {
            position: Vec2::new(col as f32, row as f32),
            color,
        }
    }

    /// The grid cell the walker paints, as `(row, col)`.
    pub fn cell(&self) -> (usize, usize) {
        let p = self.position.round().max(Vec2::ZERO);
        (p.y as usize, p.x as usize)
    }
}

/// Seeds walkers on roughly [`SEED_FRACTION`] of the colored cells. If the sample came up
/// empty but the grid has color, one walker starts on a uniformly random colored cell.
pub fn seed_walkers(grid: &Grid, rng: &mut dyn Rng) -> Vec<Walker> {
    let mut walkers = Vec::new();
    for (row, col, color) in grid.colored_cells() {
        if chance(rng, SEED_FRACTION) {
            walkers.push(Walker::new(row, col, color));
        }
    }
    if walkers.is_empty() {
        let colored = grid.colored_count();
        if colored > 0 {
            let pick = rand_index(rng, colored);
            if let Some((row, col, color)) = grid.colored_cells().nth(pick) {
                walkers.push(Walker::new(row, col, color));
            }
        }
    }
    walkers
}

/// Advances every walker once and stamps its color at its new cell.
///
/// An empty walker list is seeded from the grid first. Branches are appended after the
/// existing walkers, then the list is cut back to [`WALKER_CAP`], so the newest
/// branches are the first to go.
pub fn step(
    grid: &Grid,
    params: &VeinParams,
    walkers: &mut Vec<Walker>,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Grid {
    let mut out = grid.clone();
    if grid.is_empty() {
        return out;
    }
    if walkers.is_empty() {
        *walkers = seed_walkers(grid, rng);
        if walkers.is_empty() {
            return out;
        }
        sink.send(SpreadEvent::WalkersSeeded {
            count: walkers.len(),
        });
    }

    let food: Vec<Vec2> = grid
        .colored_cells()
        .map(|(row, col, _)| Vec2::new(col as f32, row as f32))
        .collect();
    let max = Vec2::new((grid.cols() - 1) as f32, (grid.rows() - 1) as f32);

    let mut branches = Vec::new();
    for walker in walkers.iter_mut() {
        let seek = if chance(rng, params.seek_strength) {
            toward_nearest(walker.position, &food)
        } else {
            None
        };
        let delta = match seek {
            Some(delta) => delta,
            None => random_step(rng),
        };
        walker.position = (walker.position + delta).clamp(Vec2::ZERO, max);
        let (row, col) = walker.cell();
        out.set(row, col, walker.color);
        if chance(rng, params.branch_chance) {
            branches.push(walker.clone());
        }
    }

    walkers.extend(branches);
    if walkers.len() > WALKER_CAP {
        let dropped = walkers.len() - WALKER_CAP;
        walkers.truncate(WALKER_CAP);
        trace!("vein dropped {dropped} walkers at the population cap");
        sink.send(SpreadEvent::WalkersTruncated { dropped });
    }
    out
}

/// Unit sign step toward the closest food strictly more than one cell away.
fn toward_nearest(from: Vec2, food: &[Vec2]) -> Option<Vec2> {
    food.iter()
        .map(|&f| (f, from.distance_squared(f)))
        .filter(|&(_, d2)| d2 > 1.0)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(f, _)| {
            let d = f - from;
            Vec2::new(sign(d.x), sign(d.y))
        })
}

fn random_step(rng: &mut dyn Rng) -> Vec2 {
    let dx = rand_index(rng, 3) as f32 - 1.0;
    let dy = rand_index(rng, 3) as f32 - 1.0;
    Vec2::new(dx, dy)
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;

    #[test]
    fn empty_grid_seeds_nothing() {
        let g = Grid::new(4, 4);
        let mut walkers = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let out = step(&g, &VeinParams::default(), &mut walkers, &mut rng, &mut ());
        assert!(walkers.is_empty());
        assert_eq!(out, g);
    }

    #[test]
    fn single_colored_cell_always_gets_a_walker() {
        let mut g = Grid::new(6, 6);
        g.set(3, 2, 4);
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let walkers = seed_walkers(&g, &mut rng);
            assert_eq!(walkers, vec![Walker::new(3, 2, 4)]);
        }
    }

    #[test]
    fn walkers_stay_in_bounds_and_paint_their_color() {
        let mut g = Grid::new(5, 5);
        g.set(0, 0, 2);
        let mut walkers = vec![Walker::new(0, 0, 2), Walker::new(4, 4, 3)];
        let params = VeinParams {
            seek_strength: 0.0,
            branch_chance: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(17);
        let mut grid = g;
        for _ in 0..50 {
            grid = step(&grid, &params, &mut walkers, &mut rng, &mut ());
            for w in &walkers {
                let (r, c) = w.cell();
                assert!(r < 5 && c < 5);
                // A later walker may paint over an earlier one landing on the same cell.
                assert!(matches!(grid.get(r, c), 2 | 3));
            }
        }
        assert_eq!(walkers.len(), 2);
    }

    #[test]
    fn full_seek_steps_toward_distant_food() {
        let mut g = Grid::new(1, 8);
        g.set(0, 7, 5);
        let mut walkers = vec![Walker::new(0, 0, 1)];
        let params = VeinParams {
            seek_strength: 1.0,
            branch_chance: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let out = step(&g, &params, &mut walkers, &mut rng, &mut ());
        assert_eq!(walkers[0].cell(), (0, 1));
        assert_eq!(out.get(0, 1), 1);
    }

    #[test]
    fn population_cap_keeps_the_oldest() {
        let mut g = Grid::new(20, 20);
        g.set(10, 10, 1);
        let mut walkers: Vec<Walker> = (0..250)
            .map(|i| Walker::new(i % 20, (i / 20) % 20, (i + 1) as Color))
            .collect();
        let params = VeinParams {
            seek_strength: 0.0,
            branch_chance: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut sink = VecSink::new();
        step(&g, &params, &mut walkers, &mut rng, &mut sink);
        assert_eq!(walkers.len(), WALKER_CAP);
        for (i, w) in walkers.iter().enumerate() {
            assert_eq!(w.color, (i + 1) as Color);
        }
        assert!(matches!(
            sink.as_slice(),
            [SpreadEvent::WalkersTruncated { dropped: 300 }]
        ));
    }
}
