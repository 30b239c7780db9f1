//! State of one timed loop.
use std::time::Duration;

/// Flags, live rate and timing baseline of one channel.
///
/// `enabled` is the permission to run, `running` whether the loop is currently
/// scheduled. The rate is read on every frame, so changing it takes effect on the
/// next interval without a restart.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub(crate) enabled: bool,
    pub(crate) running: bool,
    pub(crate) rate: f64,
    /// Frame time of the last invocation, or of the first frame after `start`.
    pub(crate) baseline: Option<Duration>,
}

impl Channel {
    pub fn new(rate: f64, enabled: bool) -> Self {
        Self {
            enabled,
            running: false,
            rate,
            baseline: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Configured rate in ticks per second, before any floor or substitution.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub(crate) fn halt(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.baseline = None;
        was_running
    }

    /// Decides whether the channel fires at frame time `now`.
    ///
    /// The first frame after a start only records the baseline. A firing resets the
    /// baseline to `now`, so intervals shorter than a frame collapse to one tick per frame.
    pub(crate) fn poll(&mut self, now: Duration, interval: Duration) -> bool {
        if !self.running {
            return false;
        }
        let Some(baseline) = self.baseline else {
            self.baseline = Some(now);
            return false;
        };
        if now.saturating_sub(baseline) >= interval {
            self.baseline = Some(now);
            true
        } else {
            false
        }
    }
}

/// Time between invocations for `rate` ticks per second, never faster than `floor` allows.
pub fn interval_for(rate: f64, floor: f64) -> Duration {
    let effective = if rate.is_nan() { floor } else { rate.max(floor) };
    Duration::try_from_secs_f64(1.0 / effective).unwrap_or(Duration::MAX)
}
