use std::time::Duration;

use grid_spread::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn grid(rows: Vec<Vec<Color>>) -> Grid {
    Grid::from_rows(rows).unwrap()
}

fn run(pattern: Pattern, input: &Grid, params: &SpreadParams, seed: u64) -> Grid {
    let mut state = PatternState::default();
    let mut rng = StdRng::seed_from_u64(seed);
    transform(pattern, input, params, &mut state, &mut rng)
}

fn sorted_colors(g: &Grid) -> Vec<Color> {
    let mut colors: Vec<Color> = g.cells().iter().copied().filter(|&c| c != EMPTY).collect();
    colors.sort_unstable();
    colors
}

#[test]
fn lone_cell_dies_out_under_conway() {
    let input = grid(vec![vec![0, 0, 0], vec![0, 5, 0], vec![0, 0, 0]]);
    let out = run(Pattern::Conway, &input, &SpreadParams::default(), 1);
    assert_eq!(out, Grid::new(3, 3));
}

#[test]
fn conway_blinker_oscillates() {
    let input = grid(vec![vec![0, 0, 0], vec![2, 2, 2], vec![0, 0, 0]]);
    let params = SpreadParams::default();
    let once = run(Pattern::Conway, &input, &params, 1);
    assert_eq!(
        once.to_rows(),
        vec![vec![0, 2, 0], vec![0, 2, 0], vec![0, 2, 0]]
    );
    assert_eq!(run(Pattern::Conway, &once, &params, 1), input);
}

#[test]
fn scramble_clamps_to_one_swap_for_three_cells() {
    let input = grid(vec![vec![1, 0, 2], vec![0, 0, 0], vec![3, 0, 0]]);
    let mut params = SpreadParams::default();
    params.scramble.swap_count = 100;
    for seed in 0..20 {
        let out = run(Pattern::Scramble, &input, &params, seed);
        let changed = input
            .cells()
            .iter()
            .zip(out.cells())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 2, "seed {seed}");
        assert_eq!(sorted_colors(&out), vec![1, 2, 3]);
    }
}

#[test]
fn packed_column_cannot_flow() {
    let input = grid(vec![vec![1], vec![2], vec![3], vec![4]]);
    let mut params = SpreadParams::default();
    params.flow.direction = FlowDirection::Down;
    params.flow.flow_chance = 1.0;
    let out = run(Pattern::Flow, &input, &params, 3);
    assert_eq!(out.get(3, 0), 4);
    assert_eq!(sorted_colors(&out), vec![1, 2, 3, 4]);
    assert_eq!(out, input);
}

#[test]
fn column_with_a_gap_advances_one_row() {
    let input = grid(vec![vec![1], vec![2], vec![3], vec![0]]);
    let mut params = SpreadParams::default();
    params.flow.flow_chance = 1.0;
    let out = run(Pattern::Flow, &input, &params, 3);
    assert_eq!(out.to_rows(), vec![vec![0], vec![1], vec![2], vec![3]]);
}

#[test]
fn vortex_rotates_the_ring_clockwise() {
    let input = grid(vec![vec![1, 2, 3], vec![8, 9, 4], vec![7, 6, 5]]);
    let mut params = SpreadParams::default();
    params.vortex.vortex_count = 1;
    let out = run(Pattern::Vortex, &input, &params, 11);
    assert_eq!(
        out.to_rows(),
        vec![vec![8, 1, 2], vec![7, 9, 3], vec![6, 5, 4]]
    );
}

#[test]
fn walker_population_is_capped_keeping_the_oldest() {
    let mut input = Grid::new(30, 30);
    input.set(15, 15, 1);
    let originals: Vec<Walker> = (0..250)
        .map(|i| Walker::new(i % 30, (i / 30) % 30, 1 + (i % 200) as Color))
        .collect();
    let mut state = PatternState::default();
    if let EntityState::Vein(walkers) = state.view_mut(Pattern::Vein) {
        *walkers = originals.clone();
    }
    let mut params = SpreadParams::default();
    params.vein.branch_chance = 1.0;
    params.vein.seek_strength = 0.0;
    let mut rng = StdRng::seed_from_u64(8);
    let mut sink = VecSink::new();
    transform_with_events(
        Pattern::Vein,
        &input,
        &params,
        &mut state,
        &mut rng,
        &mut sink,
    );
    let walkers = state.walkers();
    assert_eq!(walkers.len(), 200);
    for (w, original) in walkers.iter().zip(&originals) {
        assert_eq!(w.color, original.color);
        let d = w.position - original.position;
        assert!(d.x.abs() <= 1.0 && d.y.abs() <= 1.0);
    }
    assert!(sink
        .as_slice()
        .contains(&SpreadEvent::WalkersTruncated { dropped: 300 }));
}

#[test]
fn ripple_rings_grow_and_expire() {
    let mut input = Grid::new(12, 12);
    input.set(6, 6, 3);
    let mut params = SpreadParams::default();
    params.ripple.ripple_chance = 1.0;
    let mut state = PatternState::default();
    let mut rng = StdRng::seed_from_u64(2);
    let out = transform(Pattern::Ripple, &input, &params, &mut state, &mut rng);
    assert_eq!(state.ripples().len(), 1);
    assert_eq!(out.get(5, 5), 3);

    params.ripple.ripple_chance = 0.0;
    let mut g = Grid::new(12, 12);
    g.set(6, 6, 3);
    for _ in 0..8 {
        g = transform(Pattern::Ripple, &g, &params, &mut state, &mut rng);
    }
    // max_radius is 4; the ripple is dropped once its radius grows past it.
    assert!(state.ripples().is_empty());
}

#[test]
fn strobe_alternates_expand_and_contract() {
    let input = grid(vec![vec![0, 0, 0], vec![2, 0, 2], vec![0, 0, 0]]);
    let params = SpreadParams::default();
    let mut state = PatternState::default();
    let mut rng = StdRng::seed_from_u64(0);
    let expanded = transform(Pattern::Strobe, &input, &params, &mut state, &mut rng);
    assert_eq!(expanded.get(1, 1), 2);
    assert!(!state.strobe_expanding());
    let contracted = transform(Pattern::Strobe, &expanded, &params, &mut state, &mut rng);
    assert!(contracted.colored_count() < expanded.colored_count());
    assert!(state.strobe_expanding());
}

#[test]
fn engine_rate_change_applies_mid_run() {
    let mut engine = SpreadEngine::new(
        EngineConfig::new(8, 8)
            .with_spread_speed(10.0)
            .with_enabled(ChannelKind::Dots, false)
            .with_enabled(ChannelKind::Shapes, false),
    );
    engine.start_all_enabled();

    let frame = Duration::from_millis(10);
    let mut fired_at = Vec::new();
    for i in 0..=50u32 {
        if i == 25 {
            engine.set_rate(ChannelKind::Spread, 5.0);
        }
        if !engine.frame(frame * i).is_empty() {
            fired_at.push(i * 10);
        }
    }
    assert_eq!(fired_at, vec![100, 200, 400]);
    assert!(engine.scheduler().is_running(ChannelKind::Spread));
}
