use grid_spread::prelude::*;
use grid_spread_examples::{init_tracing, render_filmstrip_to_png, seeded_canvas, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TICKS: usize = 24;
const SNAPSHOT_EVERY: usize = 6;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let canvas = seeded_canvas(48, 48, 4, 2025);

    let params = SpreadParams::default()
        .with_spread_probability(0.35)
        .with_allowed_colors(vec![1, 2, 3, 4]);
    params.validate()?;

    let rc = RenderConfig::new(4);

    // One filmstrip per pattern: the canvas, then a snapshot every few ticks.
    for pattern in Pattern::ALL {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = PatternState::default();
        let mut grid = canvas.clone();
        let mut frames = vec![grid.clone()];
        for tick in 1..=TICKS {
            grid = transform(pattern, &grid, &params, &mut state, &mut rng);
            if tick % SNAPSHOT_EVERY == 0 {
                frames.push(grid.clone());
            }
        }
        tracing::info!(
            "{pattern}: {} -> {} colored cells",
            canvas.colored_count(),
            grid.colored_count()
        );
        render_filmstrip_to_png(&frames, &rc, 4, format!("patterns-gallery-{pattern}.png"))?;
    }

    Ok(())
}
