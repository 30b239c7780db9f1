//! Construction-time settings for [`crate::engine::SpreadEngine`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pattern::params::check_rate;
use crate::schedule::{ChannelKind, DEFAULT_RATE_FLOOR};

/// Grid size, RNG seed and initial channel settings.
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for the engine's random source.
    pub seed: u64,
    /// Lower bound applied to every rate before computing an interval.
    pub rate_floor: f64,
    /// Spread channel rate, used for every pattern except `pulse`.
    pub spread_speed: f64,
    pub dots_rate: f64,
    pub shapes_rate: f64,
    pub spread_enabled: bool,
    pub dots_enabled: bool,
    pub shapes_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            cols: 64,
            seed: 0,
            rate_floor: DEFAULT_RATE_FLOOR,
            spread_speed: 8.0,
            dots_rate: 1.0,
            shapes_rate: 0.5,
            spread_enabled: true,
            dots_enabled: true,
            shapes_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration for a `rows x cols` grid with default rates.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rate_floor(mut self, rate_floor: f64) -> Self {
        self.rate_floor = rate_floor;
        self
    }

    pub fn with_spread_speed(mut self, ticks_per_second: f64) -> Self {
        self.spread_speed = ticks_per_second;
        self
    }

    pub fn with_dots_rate(mut self, ticks_per_second: f64) -> Self {
        self.dots_rate = ticks_per_second;
        self
    }

    pub fn with_shapes_rate(mut self, ticks_per_second: f64) -> Self {
        self.shapes_rate = ticks_per_second;
        self
    }

    /// Sets whether `channel` may be started.
    pub fn with_enabled(mut self, channel: ChannelKind, enabled: bool) -> Self {
        match channel {
            ChannelKind::Spread => self.spread_enabled = enabled,
            ChannelKind::Dots => self.dots_enabled = enabled,
            ChannelKind::Shapes => self.shapes_enabled = enabled,
        }
        self
    }

    pub fn rate(&self, channel: ChannelKind) -> f64 {
        match channel {
            ChannelKind::Spread => self.spread_speed,
            ChannelKind::Dots => self.dots_rate,
            ChannelKind::Shapes => self.shapes_rate,
        }
    }

    pub fn enabled(&self, channel: ChannelKind) -> bool {
        match channel {
            ChannelKind::Spread => self.spread_enabled,
            ChannelKind::Dots => self.dots_enabled,
            ChannelKind::Shapes => self.shapes_enabled,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        check_rate("rate_floor", self.rate_floor)?;
        check_rate("spread_speed", self.spread_speed)?;
        check_rate("dots_rate", self.dots_rate)?;
        check_rate("shapes_rate", self.shapes_rate)?;
        Ok(())
    }
}
