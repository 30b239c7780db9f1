//! Three independent frame-paced channels: `spread`, `dots` and `shapes`.
//!
//! The [`Scheduler`] holds no clock. Its host calls [`Scheduler::poll`] once per
//! animation frame with the frame time; the scheduler answers which channels are due.
//! Running the drivers is the caller's job (see [`crate::engine::SpreadEngine`]).
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub mod channel;

pub use channel::{interval_for, Channel};

/// Default lower bound on a channel's rate, in ticks per second.
pub const DEFAULT_RATE_FLOOR: f64 = 0.25;

/// Identifies one of the timed loops.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Spread,
    Dots,
    Shapes,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Spread, ChannelKind::Dots, ChannelKind::Shapes];

    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Spread => "spread",
            ChannelKind::Dots => "dots",
            ChannelKind::Shapes => "shapes",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ChannelKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownChannel { name: s.to_owned() })
    }
}

/// Owner of the three channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheduler {
    channels: [Channel; 3],
    rate_floor: f64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_FLOOR)
    }
}

impl Scheduler {
    /// Creates a scheduler with every channel enabled, stopped, at one tick per second.
    pub fn new(rate_floor: f64) -> Self {
        debug_assert!(
            rate_floor.is_finite() && rate_floor > 0.0,
            "rate_floor must be a positive finite rate"
        );
        Self {
            channels: [
                Channel::new(1.0, true),
                Channel::new(1.0, true),
                Channel::new(1.0, true),
            ],
            rate_floor,
        }
    }

    pub fn rate_floor(&self) -> f64 {
        self.rate_floor
    }

    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        &self.channels[kind.index()]
    }

    fn channel_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        &mut self.channels[kind.index()]
    }

    pub fn is_running(&self, kind: ChannelKind) -> bool {
        self.channel(kind).running
    }

    pub fn is_enabled(&self, kind: ChannelKind) -> bool {
        self.channel(kind).enabled
    }

    /// Sets the rate in ticks per second. A running channel picks it up on its next frame.
    pub fn set_rate(&mut self, kind: ChannelKind, ticks_per_second: f64) {
        self.channel_mut(kind).rate = ticks_per_second;
        debug!("{kind} rate set to {ticks_per_second}/s");
    }

    /// Grants or revokes permission to run. Revoking stops a running channel and
    /// returns `true` in that case.
    pub fn set_enabled(&mut self, kind: ChannelKind, enabled: bool) -> bool {
        let channel = self.channel_mut(kind);
        channel.enabled = enabled;
        let stopped = !enabled && channel.halt();
        debug!("{kind} enabled = {enabled}");
        stopped
    }

    /// Starts a channel. Returns `false` if it is disabled or already running.
    pub fn start(&mut self, kind: ChannelKind) -> bool {
        let channel = self.channel_mut(kind);
        if !channel.enabled {
            debug!("{kind} is disabled, start ignored");
            return false;
        }
        if channel.running {
            return false;
        }
        channel.running = true;
        channel.baseline = None;
        debug!("{kind} started");
        true
    }

    /// Stops a channel. Returns `true` if it was running.
    pub fn stop(&mut self, kind: ChannelKind) -> bool {
        let stopped = self.channel_mut(kind).halt();
        if stopped {
            debug!("{kind} stopped");
        }
        stopped
    }

    /// Starts every enabled channel that is not running; returns the ones started.
    pub fn start_all_enabled(&mut self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|&kind| self.start(kind))
            .collect()
    }

    /// Stops every running channel; returns the ones stopped.
    pub fn stop_all_running(&mut self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|&kind| self.stop(kind))
            .collect()
    }

    /// Interval the channel would wait right now for the given effective rate.
    pub fn interval(&self, rate: f64) -> Duration {
        interval_for(rate, self.rate_floor)
    }

    /// Advances every running channel to frame time `now` and returns the ones due.
    ///
    /// `effective_rate` maps a channel and its configured rate to the rate actually
    /// used this frame; it is called on every frame for every running channel.
    pub fn poll(
        &mut self,
        now: Duration,
        mut effective_rate: impl FnMut(ChannelKind, f64) -> f64,
    ) -> Vec<ChannelKind> {
        let floor = self.rate_floor;
        let mut due = Vec::new();
        for kind in ChannelKind::ALL {
            let channel = &mut self.channels[kind.index()];
            if !channel.running {
                continue;
            }
            let interval = interval_for(effective_rate(kind, channel.rate), floor);
            if channel.poll(now, interval) {
                due.push(kind);
            }
        }
        due
    }
}
