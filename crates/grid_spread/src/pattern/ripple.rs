//! Expanding rings emitted by colored cells.
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::events::{EventSink, SpreadEvent};
use crate::grid::{Color, Grid, EMPTY};
use crate::pattern::chance;
use crate::pattern::params::RippleParams;

/// Points sampled along a ring (one every 5 degrees).
pub const RING_POINTS: usize = 72;

/// Radius added after each tick.
pub const RADIUS_GROWTH: f32 = 0.5;

/// A ring centered on the cell that emitted it. `center.x` is the column.
#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    pub center: Vec2,
    pub color: Color,
    pub radius: f32,
    pub max_radius: f32,
}

impl Ripple {
    pub fn new(row: usize, col: usize, color: Color, max_radius: f32) -> Self {
        Self {
            center: Vec2::new(col as f32, row as f32),
            color,
            radius: 1.0,
            max_radius,
        }
    }

    /// Paints the ring at the current rounded radius onto empty cells only.
    pub fn draw(&self, grid: &mut Grid) {
        let radius = (self.radius + 0.5).floor();
        for k in 0..RING_POINTS {
            let angle = TAU * k as f32 / RING_POINTS as f32;
            let point = round_half_up(self.center + Vec2::from_angle(angle) * radius);
            let (row, col) = (point.y as isize, point.x as isize);
            if !grid.in_bounds(row, col) {
                continue;
            }
            let (row, col) = (row as usize, col as usize);
            if grid.get(row, col) == EMPTY {
                grid.set(row, col, self.color);
            }
        }
    }

    pub fn is_spent(&self) -> bool {
        self.radius > self.max_radius
    }
}

/// Rounds each component to the nearest integer, halves toward +infinity.
fn round_half_up(v: Vec2) -> Vec2 {
    (v + Vec2::splat(0.5)).floor()
}

/// Spawns new ripples, draws and grows every live ripple, then drops spent ones.
///
/// New ripples start at radius 1 with a maximum of a third of the larger grid side.
pub fn step(
    grid: &Grid,
    params: &RippleParams,
    ripples: &mut Vec<Ripple>,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Grid {
    let mut out = grid.clone();
    if grid.is_empty() {
        return out;
    }

    let max_radius = grid.rows().max(grid.cols()) as f32 / 3.0;
    let before = ripples.len();
    for (row, col, color) in grid.colored_cells() {
        if chance(rng, params.ripple_chance) {
            ripples.push(Ripple::new(row, col, color, max_radius));
        }
    }
    let spawned = ripples.len() - before;
    if spawned > 0 {
        sink.send(SpreadEvent::RipplesSpawned { count: spawned });
    }

    for ripple in ripples.iter_mut() {
        ripple.draw(&mut out);
        ripple.radius += RADIUS_GROWTH;
    }
    ripples.retain(|r| !r.is_spent());
    out
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn radius_one_ring_covers_the_moore_neighborhood() {
        let mut g = Grid::new(5, 5);
        Ripple::new(2, 2, 3, 10.0).draw(&mut g);
        assert_eq!(g.colored_count(), 8);
        assert_eq!(g.get(2, 2), EMPTY);
        assert_eq!(g.get(1, 1), 3);
    }

    #[test]
    fn ring_points_round_halves_up() {
        assert_eq!(
            round_half_up(Vec2::new(-0.5, 2.5)),
            Vec2::new(0.0, 3.0)
        );
        assert_eq!(
            round_half_up(Vec2::new(-1.5, 0.49)),
            Vec2::new(-1.0, 0.0)
        );
    }

    #[test]
    fn ring_does_not_overwrite_colored_cells() {
        let mut g = Grid::new(5, 5);
        g.set(2, 3, 9);
        Ripple::new(2, 2, 3, 10.0).draw(&mut g);
        assert_eq!(g.get(2, 3), 9);
    }

    #[test]
    fn ripple_lives_until_radius_passes_max() {
        let g = Grid::new(9, 9);
        let params = RippleParams { ripple_chance: 0.0 };
        let mut ripples = vec![Ripple::new(4, 4, 2, 3.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let mut grid = g;
        // Drawn at radius 1, 1.5, 2, 2.5 and 3; gone once it grows to 3.5.
        for tick in 0..5 {
            assert_eq!(ripples.len(), 1, "tick {tick}");
            grid = step(&grid, &params, &mut ripples, &mut rng, &mut ());
        }
        assert!(ripples.is_empty());
        assert_eq!(grid.get(4, 7), 2);
        assert_eq!(grid.get(4, 4), EMPTY);
    }

    #[test]
    fn certain_chance_spawns_one_ripple_per_colored_cell() {
        let mut g = Grid::new(6, 6);
        g.set(1, 1, 1);
        g.set(4, 4, 2);
        let mut ripples = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        step(
            &g,
            &RippleParams { ripple_chance: 1.0 },
            &mut ripples,
            &mut rng,
            &mut (),
        );
        assert_eq!(ripples.len(), 2);
        assert!(ripples.iter().all(|r| r.radius == 1.5 && r.max_radius == 2.0));
    }
}
