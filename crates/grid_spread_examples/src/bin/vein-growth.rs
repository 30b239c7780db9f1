use grid_spread::prelude::*;
use grid_spread_examples::{init_tracing, render_filmstrip_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut grid = Grid::new(80, 80);
    grid.set(40, 40, 1);
    grid.set(10, 70, 2);
    grid.set(70, 12, 3);

    let mut params = SpreadParams::default();
    params.vein.seek_strength = 0.15;
    params.vein.branch_chance = 0.08;
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(99);
    let mut state = PatternState::default();
    let mut sink = VecSink::new();
    let mut frames = Vec::new();
    for tick in 0..240 {
        grid = transform_with_events(
            Pattern::Vein,
            &grid,
            &params,
            &mut state,
            &mut rng,
            &mut sink,
        );
        if tick % 60 == 59 {
            tracing::info!(
                "tick {}: {} walkers, {} colored cells",
                tick + 1,
                state.walkers().len(),
                grid.colored_count()
            );
            frames.push(grid.clone());
        }
    }

    let truncations = sink
        .as_slice()
        .iter()
        .filter(|e| matches!(e, SpreadEvent::WalkersTruncated { .. }))
        .count();
    tracing::info!("population cap reached on {truncations} ticks");

    render_filmstrip_to_png(&frames, &RenderConfig::new(3), 6, "vein-growth.png")?;
    Ok(())
}
