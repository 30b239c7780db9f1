use std::time::Duration;

use grid_spread::prelude::*;
use grid_spread_examples::{init_tracing, render_grid_to_png, seeded_canvas, RenderConfig};

const FRAME: Duration = Duration::from_micros(16_667);
const SECONDS: u32 = 12;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = EngineConfig::new(64, 96)
        .with_seed(42)
        .with_spread_speed(12.0)
        .with_dots_rate(2.0)
        .with_shapes_rate(0.5);
    let mut engine = SpreadEngine::try_new(config)?
        .with_grid(seeded_canvas(64, 96, 3, 42))
        .with_pattern(Pattern::Tendrils);
    engine.set_params(SpreadParams::default().with_allowed_colors(vec![1, 2, 3, 5]))?;
    engine.start_all_enabled();

    let mut sink = FnSink::new(|event| match event {
        SpreadEvent::ChannelTicked { .. } => tracing::debug!("{event:?}"),
        other => tracing::info!("{other:?}"),
    });

    // Simulated 60 Hz host loop; the pattern changes every few seconds while running.
    let schedule = [
        (0, Pattern::Tendrils),
        (3, Pattern::Vein),
        (6, Pattern::Pulse),
        (9, Pattern::Ripple),
    ];
    let frames = SECONDS * 60;
    for i in 0..frames {
        let now = FRAME * i;
        if i % 60 == 0 {
            let second = i / 60;
            if let Some(&(_, pattern)) = schedule.iter().find(|(at, _)| *at == second) {
                engine.set_pattern(pattern);
                tracing::info!(
                    "t={second}s pattern={pattern} spread rate={}/s",
                    engine.effective_spread_rate()
                );
            }
        }
        engine.frame_with_events(now, &mut sink);
    }
    engine.stop_all_running();
    engine.frame_with_events(FRAME * frames, &mut sink);

    for channel in ChannelKind::ALL {
        tracing::info!("{channel}: {} ticks", engine.ticks(channel));
    }
    render_grid_to_png(
        engine.grid(),
        &RenderConfig::new(6),
        "engine-headless-session.png",
    )?;

    Ok(())
}
