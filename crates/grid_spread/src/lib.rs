#![forbid(unsafe_code)]
//! grid_spread: procedural spread patterns and frame-paced channels for colored grids.
//!
//! Modules:
//! - grid: the color-index matrix and neighborhood helpers
//! - pattern: the 13 spread algorithms, their parameters and entity state (walkers, ripples, strobe)
//! - decorate: random dot and shape placement
//! - schedule: the three variable-rate channels (spread, dots, shapes)
//! - engine: the facade that owns grid, pattern, parameters and scheduler
//! - events: observer sinks for ticks and entity lifecycle
//!
//! All randomness is drawn from a caller-provided [`rand::Rng`], so a seeded
//! generator replays a run exactly.
pub mod config;
pub mod decorate;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod pattern;
pub mod schedule;

/// Convenient re-exports for common types. Import with `use grid_spread::prelude::*;`.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::decorate::{
        add_random_dots, add_random_dots_with_events, add_random_shapes,
        add_random_shapes_with_events, LineOrientation, Shape,
    };
    pub use crate::engine::SpreadEngine;
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, SpreadEvent, VecSink};
    pub use crate::grid::{Color, Grid, Neighborhood, EMPTY};
    pub use crate::pattern::params::{
        CrystallizeParams, Direction8, DirectionalParams, ErosionParams, FlowDirection,
        FlowParams, JitterParams, LifeRule, NeighborMode, PulseParams, RandomWalkParams,
        RippleParams, ScrambleParams, SpreadParams, StrobeParams, VeinParams, VortexParams,
    };
    pub use crate::pattern::{
        transform, transform_with_events, EntityState, Pattern, PatternState, Ripple, Walker,
    };
    pub use crate::schedule::{ChannelKind, Scheduler};
}
