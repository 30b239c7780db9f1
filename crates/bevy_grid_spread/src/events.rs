use bevy::prelude::*;
use grid_spread::prelude::{ChannelKind, EventSink, Grid, Pattern, SpreadEvent};

/// Bevy message wrapping one [`SpreadEvent`] emitted by the engine.
#[derive(Message, Debug, Clone)]
pub struct SpreadMessage {
    pub event: SpreadEvent,
}

/// Written once per frame in which at least one channel installed a new grid.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct GridUpdated {
    /// Channels that fired this frame, in firing order.
    pub channels: Vec<ChannelKind>,
    pub colored_cells: usize,
}

/// Control input for the engine, applied before the frame is driven.
#[derive(Message, Debug, Clone)]
pub enum SpreadCommand {
    Start(ChannelKind),
    Stop(ChannelKind),
    StartAllEnabled,
    StopAllRunning,
    SetRate(ChannelKind, f64),
    SetEnabled(ChannelKind, bool),
    SetPattern(Pattern),
    /// Run a channel's driver once, outside the timer.
    Step(ChannelKind),
    ReplaceGrid(Grid),
    Resize { rows: usize, cols: usize },
}

/// Event sink that buffers engine events for the message writer.
#[derive(Default)]
pub struct MessageBuffer {
    pub events: Vec<SpreadMessage>,
}

impl EventSink for MessageBuffer {
    #[inline]
    fn send(&mut self, event: SpreadEvent) {
        self.events.push(SpreadMessage { event });
    }
}
