//! The engine facade: the committed grid, the active pattern with its entities, the
//! parameter bag and the scheduler, driven one animation frame at a time.
use std::mem;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::decorate::{add_random_dots_with_events, add_random_shapes_with_events};
use crate::error::Result;
use crate::events::{EventSink, SpreadEvent};
use crate::grid::Grid;
use crate::pattern::{transform_with_events, Pattern, PatternState, SpreadParams};
use crate::schedule::{ChannelKind, Scheduler};

/// Single-owner simulation core.
///
/// Control calls (`start`, `stop`, `set_enabled`, ...) take effect immediately; the
/// events they produce are queued and delivered by the next
/// [`SpreadEngine::frame_with_events`].
pub struct SpreadEngine {
    grid: Grid,
    pattern: Pattern,
    params: SpreadParams,
    state: PatternState,
    scheduler: Scheduler,
    rng: StdRng,
    ticks: [u64; 3],
    pending: Vec<SpreadEvent>,
}

impl SpreadEngine {
    pub fn try_new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(&config))
    }

    pub fn new(config: EngineConfig) -> Self {
        debug_assert!(
            config.rows > 0 && config.cols > 0,
            "grid must be at least 1x1"
        );
        debug_assert!(
            config.rate_floor.is_finite() && config.rate_floor > 0.0,
            "rate_floor must be a positive finite rate"
        );
        Self::build(&config)
    }

    fn build(config: &EngineConfig) -> Self {
        let mut scheduler = Scheduler::new(config.rate_floor);
        for kind in ChannelKind::ALL {
            scheduler.set_rate(kind, config.rate(kind));
            scheduler.set_enabled(kind, config.enabled(kind));
        }
        debug!(
            "spread engine {}x{} seeded with {}",
            config.rows, config.cols, config.seed
        );
        Self {
            grid: Grid::new(config.rows, config.cols),
            pattern: Pattern::default(),
            params: SpreadParams::default(),
            state: PatternState::default(),
            scheduler,
            rng: StdRng::seed_from_u64(config.seed),
            ticks: [0; 3],
            pending: Vec::new(),
        }
    }

    /// Installs a starting grid.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_params(mut self, params: SpreadParams) -> Self {
        self.params = params;
        self
    }

    /// The committed grid, as seen by renderers and by the next tick.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Replaces the committed grid wholesale (external painting, loading, clearing).
    pub fn replace_grid(&mut self, grid: Grid) -> Grid {
        mem::replace(&mut self.grid, grid)
    }

    /// Resizes the grid, keeping contents top-left aligned and zero-filling the rest.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.grid = self.grid.resized(rows, cols);
        debug!("grid resized to {rows}x{cols}");
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Selects the active pattern. Entities of other patterns are kept as they are.
    pub fn set_pattern(&mut self, pattern: Pattern) {
        if pattern != self.pattern {
            debug!("pattern {} -> {}", self.pattern, pattern);
            self.pattern = pattern;
        }
    }

    pub fn params(&self) -> &SpreadParams {
        &self.params
    }

    /// Direct access to the parameter bag; changes apply from the next tick on.
    pub fn params_mut(&mut self) -> &mut SpreadParams {
        &mut self.params
    }

    /// Replaces the parameter bag after validating it.
    pub fn set_params(&mut self, params: SpreadParams) -> Result<()> {
        if let Err(err) = params.validate() {
            warn!("rejected spread parameters: {err}");
            return Err(err);
        }
        self.params = params;
        Ok(())
    }

    pub fn state(&self) -> &PatternState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of times `channel` has fired.
    pub fn ticks(&self, channel: ChannelKind) -> u64 {
        self.ticks[channel as usize]
    }

    /// Restarts the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Rate the spread channel runs at for the active pattern.
    pub fn effective_spread_rate(&self) -> f64 {
        effective_rate(
            self.pattern,
            self.params.pulse.speed,
            ChannelKind::Spread,
            self.scheduler.channel(ChannelKind::Spread).rate(),
        )
    }

    pub fn set_rate(&mut self, channel: ChannelKind, ticks_per_second: f64) {
        if !ticks_per_second.is_finite() || ticks_per_second <= 0.0 {
            warn!(
                "{channel} rate {ticks_per_second} is not positive, the floor of {}/s applies",
                self.scheduler.rate_floor()
            );
        }
        self.scheduler.set_rate(channel, ticks_per_second);
    }

    pub fn set_enabled(&mut self, channel: ChannelKind, enabled: bool) {
        if self.scheduler.set_enabled(channel, enabled) {
            self.pending.push(SpreadEvent::ChannelStopped { channel });
        }
    }

    /// Starts `channel` if it is enabled and idle. Starting the spread channel clears
    /// the entities of the active pattern.
    pub fn start(&mut self, channel: ChannelKind) -> bool {
        if !self.scheduler.start(channel) {
            return false;
        }
        self.pending.push(SpreadEvent::ChannelStarted { channel });
        if channel == ChannelKind::Spread && self.state.reset(self.pattern) {
            self.pending.push(SpreadEvent::EntitiesReset {
                pattern: self.pattern,
            });
        }
        true
    }

    pub fn stop(&mut self, channel: ChannelKind) -> bool {
        if !self.scheduler.stop(channel) {
            return false;
        }
        self.pending.push(SpreadEvent::ChannelStopped { channel });
        true
    }

    pub fn start_all_enabled(&mut self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|&channel| self.start(channel))
            .collect()
    }

    pub fn stop_all_running(&mut self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|&channel| self.stop(channel))
            .collect()
    }

    /// Runs one animation frame at time `now` and returns the channels that fired.
    pub fn frame(&mut self, now: Duration) -> Vec<ChannelKind> {
        self.frame_with_events(now, &mut ())
    }

    /// Like [`SpreadEngine::frame`], delivering queued control events and tick events to `sink`.
    pub fn frame_with_events(
        &mut self,
        now: Duration,
        sink: &mut dyn EventSink,
    ) -> Vec<ChannelKind> {
        for event in self.pending.drain(..) {
            sink.send(event);
        }
        let pattern = self.pattern;
        let pulse_speed = self.params.pulse.speed;
        let due = self.scheduler.poll(now, |kind, rate| {
            effective_rate(pattern, pulse_speed, kind, rate)
        });
        for &channel in &due {
            self.fire(channel, sink);
        }
        due
    }

    /// Runs the driver of `channel` once and installs its result.
    pub fn fire(&mut self, channel: ChannelKind, sink: &mut dyn EventSink) {
        let next = match channel {
            ChannelKind::Spread => transform_with_events(
                self.pattern,
                &self.grid,
                &self.params,
                &mut self.state,
                &mut self.rng,
                sink,
            ),
            ChannelKind::Dots => add_random_dots_with_events(
                &self.grid,
                &self.params.allowed_colors,
                &mut self.rng,
                sink,
            ),
            ChannelKind::Shapes => add_random_shapes_with_events(
                &self.grid,
                &self.params.allowed_colors,
                &mut self.rng,
                sink,
            ),
        };
        self.grid = next;
        let tick = &mut self.ticks[channel as usize];
        *tick += 1;
        let colored_cells = self.grid.colored_count();
        trace!("{channel} tick {}: {colored_cells} colored cells", *tick);
        sink.send(SpreadEvent::ChannelTicked {
            channel,
            tick: *tick,
            colored_cells,
        });
    }

    /// Advances the active pattern once, outside the timer.
    pub fn step_spread(&mut self) -> &Grid {
        self.fire(ChannelKind::Spread, &mut ());
        &self.grid
    }

    pub fn add_dots(&mut self) -> &Grid {
        self.fire(ChannelKind::Dots, &mut ());
        &self.grid
    }

    pub fn add_shapes(&mut self) -> &Grid {
        self.fire(ChannelKind::Shapes, &mut ());
        &self.grid
    }
}

fn effective_rate(pattern: Pattern, pulse_speed: f64, kind: ChannelKind, rate: f64) -> f64 {
    if kind == ChannelKind::Spread && pattern == Pattern::Pulse {
        pulse_speed
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecSink;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn engine() -> SpreadEngine {
        SpreadEngine::new(EngineConfig::new(16, 16).with_seed(7))
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        assert!(SpreadEngine::try_new(EngineConfig::new(0, 4)).is_err());
    }

    #[test]
    fn pulse_substitutes_its_own_speed() {
        let mut e = engine();
        e.set_rate(ChannelKind::Spread, 3.0);
        e.params_mut().pulse.speed = 12.0;
        assert_eq!(e.effective_spread_rate(), 3.0);
        e.set_pattern(Pattern::Pulse);
        assert_eq!(e.effective_spread_rate(), 12.0);
    }

    #[test]
    fn pulse_speed_is_reread_every_frame() {
        let mut e = engine().with_pattern(Pattern::Pulse);
        e.set_rate(ChannelKind::Spread, 1.0);
        e.params_mut().pulse.speed = 10.0;
        e.start(ChannelKind::Spread);
        e.frame(ms(0));
        assert_eq!(e.frame(ms(100)), vec![ChannelKind::Spread]);
        e.set_pattern(Pattern::Conway);
        assert!(e.frame(ms(200)).is_empty());
        assert_eq!(e.frame(ms(1100)), vec![ChannelKind::Spread]);
    }

    #[test]
    fn starting_spread_resets_active_entities_only() {
        let mut g = Grid::new(16, 16);
        g.set(8, 8, 2);
        let mut e = engine().with_grid(g).with_pattern(Pattern::Vein);
        e.step_spread();
        assert!(!e.state().walkers().is_empty());

        e.set_pattern(Pattern::Strobe);
        e.step_spread();
        assert!(!e.state().strobe_expanding());
        assert!(e.start(ChannelKind::Spread));
        assert!(e.state().strobe_expanding());
        assert!(!e.state().walkers().is_empty());

        let mut sink = VecSink::new();
        e.frame_with_events(ms(0), &mut sink);
        assert_eq!(
            sink.as_slice(),
            &[
                SpreadEvent::ChannelStarted {
                    channel: ChannelKind::Spread
                },
                SpreadEvent::EntitiesReset {
                    pattern: Pattern::Strobe
                },
            ]
        );
    }

    #[test]
    fn restarting_spread_clears_vein_walkers() {
        let mut g = Grid::new(16, 16);
        g.set(8, 8, 2);
        g.set(3, 12, 5);
        let mut e = engine().with_grid(g).with_pattern(Pattern::Vein);
        assert!(e.start(ChannelKind::Spread));
        e.frame(ms(0));
        e.frame(ms(1000));
        assert!(!e.state().walkers().is_empty());

        e.stop(ChannelKind::Spread);
        e.frame(ms(1100));
        assert!(e.start(ChannelKind::Spread));
        assert!(e.state().walkers().is_empty());

        let mut sink = VecSink::new();
        e.frame_with_events(ms(1200), &mut sink);
        assert!(sink.as_slice().contains(&SpreadEvent::EntitiesReset {
            pattern: Pattern::Vein
        }));
    }

    #[test]
    fn starting_spread_clears_ripples() {
        let mut g = Grid::new(16, 16);
        g.set(8, 8, 4);
        let mut e = engine().with_grid(g).with_pattern(Pattern::Ripple);
        e.params_mut().ripple.ripple_chance = 1.0;
        e.step_spread();
        assert_eq!(e.state().ripples().len(), 1);

        assert!(e.start(ChannelKind::Spread));
        assert!(e.state().ripples().is_empty());
        // Already running: no second reset.
        e.step_spread();
        assert!(!e.start(ChannelKind::Spread));
        assert!(!e.state().ripples().is_empty());
    }

    #[test]
    fn pulse_front_runs_at_pulse_speed() {
        let g = Grid::from_rows(vec![vec![3, 0, 0, 0, 0, 0, 0, 0]]).unwrap();
        let mut e = engine().with_grid(g).with_pattern(Pattern::Pulse);
        e.set_rate(ChannelKind::Spread, 1.0);
        e.params_mut().pulse.speed = 5.0;
        e.start(ChannelKind::Spread);
        e.frame(ms(0));
        assert!(e.frame(ms(100)).is_empty());
        assert_eq!(e.grid().colored_count(), 1);
        assert_eq!(e.frame(ms(200)), vec![ChannelKind::Spread]);
        assert_eq!(e.grid().to_rows(), vec![vec![3; 8]]);
    }

    #[test]
    fn empty_palette_surfaces_as_a_warning() {
        let mut e = SpreadEngine::new(
            EngineConfig::new(8, 8)
                .with_enabled(ChannelKind::Spread, false)
                .with_enabled(ChannelKind::Shapes, false),
        );
        e.params_mut().allowed_colors.clear();
        let mut sink = VecSink::new();
        e.fire(ChannelKind::Dots, &mut sink);
        assert_eq!(e.grid().colored_count(), 0);
        assert_eq!(e.ticks(ChannelKind::Dots), 1);
        let warnings: Vec<_> = sink.warnings().map(|(channel, _)| channel).collect();
        assert_eq!(warnings, vec![ChannelKind::Dots]);
    }

    #[test]
    fn disabled_channels_do_not_start() {
        let mut e = SpreadEngine::new(
            EngineConfig::new(8, 8).with_enabled(ChannelKind::Dots, false),
        );
        assert_eq!(
            e.start_all_enabled(),
            vec![ChannelKind::Spread, ChannelKind::Shapes]
        );
        e.set_enabled(ChannelKind::Shapes, false);
        assert!(!e.scheduler().is_running(ChannelKind::Shapes));
        assert_eq!(e.stop_all_running(), vec![ChannelKind::Spread]);
    }

    #[test]
    fn decorator_channels_tick_and_count() {
        let mut e = SpreadEngine::new(
            EngineConfig::new(20, 20)
                .with_dots_rate(10.0)
                .with_enabled(ChannelKind::Spread, false)
                .with_enabled(ChannelKind::Shapes, false),
        );
        e.params_mut().allowed_colors = vec![3];
        e.start_all_enabled();
        let mut sink = VecSink::new();
        for t in (0..=300).step_by(50) {
            e.frame_with_events(ms(t), &mut sink);
        }
        assert_eq!(e.ticks(ChannelKind::Dots), 3);
        assert!(e.grid().colored_count() > 0);
        assert_eq!(e.grid().colors(), vec![3]);
        let ticked = sink
            .as_slice()
            .iter()
            .filter(|ev| matches!(ev, SpreadEvent::ChannelTicked { .. }))
            .count();
        assert_eq!(ticked, 3);
    }

    #[test]
    fn invalid_params_are_rejected_and_kept() {
        let mut e = engine();
        let bad = SpreadParams::default().with_spread_probability(-1.0);
        assert!(e.set_params(bad).is_err());
        assert_eq!(e.params(), &SpreadParams::default());
    }

    #[test]
    fn resize_keeps_top_left() {
        let mut e = engine();
        let mut g = Grid::new(16, 16);
        g.set(0, 0, 4);
        g.set(15, 15, 4);
        e.replace_grid(g);
        e.resize(8, 24);
        assert_eq!(e.grid().rows(), 8);
        assert_eq!(e.grid().cols(), 24);
        assert_eq!(e.grid().colored_count(), 1);
    }
}
