//! The pattern engine: grid-to-grid transforms selected by [`Pattern`].
//!
//! Every transform allocates a fresh grid of the input's size and never mutates its
//! input. Randomness always comes from the caller's RNG so a seeded generator replays a
//! run exactly. The three stateful patterns (`vein`, `ripple`, `strobe`) additionally
//! read and update their entity state in [`PatternState`].
use std::fmt;
use std::str::FromStr;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::events::{EventSink, SpreadEvent};
use crate::grid::Grid;

pub mod automaton;
pub mod motion;
pub mod params;
pub mod ripple;
pub mod spread;
pub mod state;
pub mod vein;

pub use params::SpreadParams;
pub use ripple::Ripple;
pub use state::{EntityState, PatternState};
pub use vein::Walker;

/// Selector for the active spread rule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Pattern {
    #[default]
    Conway,
    Tendrils,
    Crystallize,
    Vein,
    Erosion,
    RandomWalk,
    Directional,
    Scramble,
    Jitter,
    Strobe,
    Flow,
    Pulse,
    Vortex,
    Ripple,
}

impl Pattern {
    pub const ALL: [Pattern; 14] = [
        Pattern::Conway,
        Pattern::Tendrils,
        Pattern::Crystallize,
        Pattern::Vein,
        Pattern::Erosion,
        Pattern::RandomWalk,
        Pattern::Directional,
        Pattern::Scramble,
        Pattern::Jitter,
        Pattern::Strobe,
        Pattern::Flow,
        Pattern::Pulse,
        Pattern::Vortex,
        Pattern::Ripple,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pattern::Conway => "conway",
            Pattern::Tendrils => "tendrils",
            Pattern::Crystallize => "crystallize",
            Pattern::Vein => "vein",
            Pattern::Erosion => "erosion",
            Pattern::RandomWalk => "randomWalk",
            Pattern::Directional => "directional",
            Pattern::Scramble => "scramble",
            Pattern::Jitter => "jitter",
            Pattern::Strobe => "strobe",
            Pattern::Flow => "flow",
            Pattern::Pulse => "pulse",
            Pattern::Vortex => "vortex",
            Pattern::Ripple => "ripple",
        }
    }

    /// Whether the pattern carries entity state between ticks.
    pub fn is_stateful(self) -> bool {
        matches!(self, Pattern::Vein | Pattern::Ripple | Pattern::Strobe)
    }

    /// The next pattern in [`Pattern::ALL`], wrapping around.
    pub fn next(self) -> Pattern {
        let i = self.position();
        Pattern::ALL[(i + 1) % Pattern::ALL.len()]
    }

    /// The previous pattern in [`Pattern::ALL`], wrapping around.
    pub fn prev(self) -> Pattern {
        let i = self.position();
        Pattern::ALL[(i + Pattern::ALL.len() - 1) % Pattern::ALL.len()]
    }

    fn position(self) -> usize {
        Pattern::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = Error;

    /// Accepts the canonical names as well as snake_case and case-insensitive spellings.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Pattern::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(&key))
            .ok_or_else(|| Error::UnknownPattern { name: s.to_owned() })
    }
}

/// Runs one tick of `pattern` over `grid`.
pub fn transform(
    pattern: Pattern,
    grid: &Grid,
    params: &SpreadParams,
    state: &mut PatternState,
    rng: &mut dyn Rng,
) -> Grid {
    transform_with_events(pattern, grid, params, state, rng, &mut ())
}

/// Runs one tick of `pattern` over `grid`, reporting entity lifecycle events to `sink`.
pub fn transform_with_events(
    pattern: Pattern,
    grid: &Grid,
    params: &SpreadParams,
    state: &mut PatternState,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Grid {
    let out = match state.view_mut(pattern) {
        EntityState::Vein(walkers) => vein::step(grid, &params.vein, walkers, rng, sink),
        EntityState::Ripple(ripples) => ripple::step(grid, &params.ripple, ripples, rng, sink),
        EntityState::Strobe(expanding) => {
            sink.send(SpreadEvent::StrobePhase {
                expanding: *expanding,
            });
            automaton::strobe(grid, &params.strobe, expanding)
        }
        EntityState::Idle => stateless(pattern, grid, params, rng),
    };
    trace!(
        "{} tick: {} -> {} colored cells",
        pattern,
        grid.colored_count(),
        out.colored_count()
    );
    out
}

fn stateless(pattern: Pattern, grid: &Grid, params: &SpreadParams, rng: &mut dyn Rng) -> Grid {
    match pattern {
        Pattern::Conway => automaton::life(grid, &params.conway, params.fallback_color()),
        Pattern::Tendrils => automaton::life(grid, &params.tendrils, params.fallback_color()),
        Pattern::Crystallize => automaton::crystallize(grid, &params.crystallize),
        Pattern::Erosion => automaton::erosion(grid, &params.erosion, rng),
        Pattern::RandomWalk => {
            spread::random_walk(grid, params.spread_probability, &params.random_walk, rng)
        }
        Pattern::Directional => {
            spread::directional(grid, params.spread_probability, &params.directional, rng)
        }
        Pattern::Scramble => motion::scramble(grid, &params.scramble, rng),
        Pattern::Jitter => motion::jitter(grid, &params.jitter, rng),
        Pattern::Flow => motion::flow(grid, &params.flow, rng),
        Pattern::Pulse => spread::pulse(grid, &params.pulse),
        Pattern::Vortex => motion::vortex(grid, &params.vortex, rng),
        // Stateful patterns are dispatched through their entity view.
        Pattern::Vein | Pattern::Ripple | Pattern::Strobe => grid.clone(),
    }
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f64 {
    (rng.next_u32() as f64) / ((u32::MAX as f64) + 1.0)
}

/// Bernoulli draw. `p <= 0` is never true and `p >= 1` always is.
#[inline]
pub(crate) fn chance(rng: &mut dyn Rng, p: f32) -> bool {
    rand01(rng) < p as f64
}

/// Uniform index in `0..n`. `n` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn Rng, n: usize) -> usize {
    debug_assert!(n > 0, "rand_index needs a non-empty range");
    ((rng.next_u32() as u64 * n as u64) >> 32) as usize
}

/// Fisher-Yates shuffle.
pub(crate) fn shuffle<T>(items: &mut [T], rng: &mut dyn Rng) {
    for i in (1..items.len()).rev() {
        let j = rand_index(rng, i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::events::VecSink;

    struct FixedRng {
        value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> core::result::Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> core::result::Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_stays_below_one() {
        let mut rng = FixedRng { value: u32::MAX };
        assert!(rand01(&mut rng) < 1.0);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn chance_extremes_are_certain() {
        let mut high = FixedRng { value: u32::MAX };
        assert!(chance(&mut high, 1.0));
        let mut low = FixedRng { value: 0 };
        assert!(!chance(&mut low, 0.0));
    }

    #[test]
    fn rand_index_covers_the_range() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut rng, 7), 6);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand_index(&mut rng, 7), 0);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut items: Vec<u32> = (0..32).collect();
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for p in Pattern::ALL {
            assert_eq!(p.name().parse::<Pattern>().unwrap(), p);
        }
        assert_eq!("random_walk".parse::<Pattern>().unwrap(), Pattern::RandomWalk);
        assert!(matches!(
            "spiral".parse::<Pattern>(),
            Err(Error::UnknownPattern { .. })
        ));
    }

    #[test]
    fn next_and_prev_cycle() {
        assert_eq!(Pattern::Ripple.next(), Pattern::Conway);
        assert_eq!(Pattern::Conway.prev(), Pattern::Ripple);
        assert_eq!(Pattern::Vein.next().prev(), Pattern::Vein);
    }

    #[test]
    fn strobe_dispatch_reports_phase_and_flips() {
        let mut g = Grid::new(3, 3);
        g.set(1, 1, 2);
        let mut state = PatternState::default();
        let mut sink = VecSink::new();
        let mut rng = StdRng::seed_from_u64(0);
        transform_with_events(
            Pattern::Strobe,
            &g,
            &SpreadParams::default(),
            &mut state,
            &mut rng,
            &mut sink,
        );
        assert!(!state.strobe_expanding());
        assert_eq!(
            sink.as_slice(),
            &[SpreadEvent::StrobePhase { expanding: true }]
        );
    }

    #[test]
    fn switching_patterns_leaves_other_entities_dormant() {
        let mut g = Grid::new(8, 8);
        g.set(4, 4, 3);
        let params = SpreadParams::default();
        let mut state = PatternState::default();
        let mut rng = StdRng::seed_from_u64(4);
        let g = transform(Pattern::Vein, &g, &params, &mut state, &mut rng);
        let walkers = state.walkers().to_vec();
        assert!(!walkers.is_empty());
        transform(Pattern::Conway, &g, &params, &mut state, &mut rng);
        transform(Pattern::Strobe, &g, &params, &mut state, &mut rng);
        assert_eq!(state.walkers(), walkers.as_slice());
    }
}
