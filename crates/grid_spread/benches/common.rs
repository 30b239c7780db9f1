use std::time::Duration;

use criterion::{Criterion, Throughput};
use grid_spread::grid::Grid;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

#[allow(dead_code)]
pub fn cells_throughput(grid: &Grid) -> Throughput {
    Throughput::Elements((grid.rows() * grid.cols()).max(1) as u64)
}

/// A square grid with roughly `fill` of its cells colored from `1..=4`.
#[allow(dead_code)]
pub fn noise_grid(side: usize, fill: f32, seed: u64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(side, side);
    for row in 0..side {
        for col in 0..side {
            let roll = rand::Rng::next_u32(&mut rng);
            if (roll as f32 / u32::MAX as f32) < fill {
                grid.set(row, col, 1 + (roll % 4) as u8);
            }
        }
    }
    grid
}
