use grid_spread::prelude::*;
use grid_spread_examples::{init_tracing, render_filmstrip_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut grid = Grid::new(60, 60);
    for (i, (r, c)) in [(15, 15), (30, 44), (46, 20)].into_iter().enumerate() {
        grid.set(r, c, 5 + i as Color);
    }

    let mut params = SpreadParams::default();
    params.ripple.ripple_chance = 0.08;
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(3);
    let mut state = PatternState::default();
    let mut frames = vec![grid.clone()];
    for tick in 1..=30 {
        grid = transform(Pattern::Ripple, &grid, &params, &mut state, &mut rng);
        if tick % 10 == 0 {
            tracing::info!("tick {tick}: {} live ripples", state.ripples().len());
            frames.push(grid.clone());
        }
    }

    render_filmstrip_to_png(&frames, &RenderConfig::new(4), 4, "ripple-pond.png")?;
    Ok(())
}
