//! Event types and sinks for observing the engine.
//!
//! This module defines [`SpreadEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while driving a [`crate::engine::SpreadEngine`] via
//! [`crate::engine::SpreadEngine::frame_with_events`] or a single transform via
//! [`crate::pattern::transform_with_events`].
use crate::pattern::Pattern;
use crate::schedule::ChannelKind;

/// Describes events emitted by the engine, the scheduler and the stateful patterns.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum SpreadEvent {
    /// A channel began running.
    ChannelStarted {
        channel: ChannelKind,
    },

    /// A channel stopped running.
    ChannelStopped {
        channel: ChannelKind,
    },

    /// A channel's driver ran and installed a new grid.
    ChannelTicked {
        channel: ChannelKind,
        /// Number of times this channel has fired since the engine was created.
        tick: u64,
        /// Colored cells in the installed grid.
        colored_cells: usize,
    },

    /// The vein walker population was seeded from the grid.
    WalkersSeeded {
        count: usize,
    },

    /// Branches were discarded to keep the walker population at its cap.
    WalkersTruncated {
        dropped: usize,
    },

    /// New ripples were emitted this tick.
    RipplesSpawned {
        count: usize,
    },

    /// The strobe ran a phase; `expanding` is the phase that just ran.
    StrobePhase {
        expanding: bool,
    },

    /// Entity state of a stateful pattern was cleared.
    EntitiesReset {
        pattern: Pattern,
    },

    /// A driver could not do its work and left the grid unchanged.
    Warning {
        channel: ChannelKind,
        message: String,
    },
}

/// Receives [`SpreadEvent`]s. `()` discards them.
pub trait EventSink {
    fn send(&mut self, event: SpreadEvent);
}

impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SpreadEvent) {}
}

/// Forwards every event to a closure.
pub struct FnSink<F: FnMut(SpreadEvent)>(pub F);

impl<F: FnMut(SpreadEvent)> FnSink<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F: FnMut(SpreadEvent)> EventSink for FnSink<F> {
    #[inline]
    fn send(&mut self, event: SpreadEvent) {
        (self.0)(event);
    }
}

/// Records events in arrival order.
#[derive(Debug, Default)]
pub struct VecSink {
    events: Vec<SpreadEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[SpreadEvent] {
        &self.events
    }

    pub fn into_inner(self) -> Vec<SpreadEvent> {
        self.events
    }

    /// Warnings recorded so far, as `(channel, message)` pairs.
    pub fn warnings(&self) -> impl Iterator<Item = (ChannelKind, &str)> + '_ {
        self.events.iter().filter_map(|event| match event {
            SpreadEvent::Warning { channel, message } => Some((*channel, message.as_str())),
            _ => None,
        })
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SpreadEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick() -> SpreadEvent {
        SpreadEvent::ChannelTicked {
            channel: ChannelKind::Spread,
            tick: 1,
            colored_cells: 4,
        }
    }

    #[test]
    fn vec_sink_keeps_arrival_order() {
        let mut sink = VecSink::new();
        sink.send(tick());
        sink.send(SpreadEvent::StrobePhase { expanding: true });
        assert_eq!(
            sink.into_inner(),
            vec![tick(), SpreadEvent::StrobePhase { expanding: true }]
        );
    }

    #[test]
    fn vec_sink_filters_warnings() {
        let mut sink = VecSink::new();
        sink.send(tick());
        sink.send(SpreadEvent::Warning {
            channel: ChannelKind::Dots,
            message: "no allowed colors".into(),
        });
        let warnings: Vec<_> = sink.warnings().collect();
        assert_eq!(warnings, vec![(ChannelKind::Dots, "no allowed colors")]);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(tick());
        sink.send(tick());
        assert_eq!(count, 2);
    }
}
