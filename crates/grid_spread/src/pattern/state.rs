//! Entity state carried between ticks by the stateful patterns.
use tracing::debug;

use crate::pattern::ripple::Ripple;
use crate::pattern::vein::Walker;
use crate::pattern::Pattern;

/// Owner of every pattern's entities. Only the active pattern's entities are ever
/// touched; the rest stay as they were until their pattern is selected again.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternState {
    walkers: Vec<Walker>,
    ripples: Vec<Ripple>,
    strobe_expanding: bool,
}

/// Mutable view of the entities owned by one pattern.
#[derive(Debug)]
pub enum EntityState<'a> {
    Idle,
    Vein(&'a mut Vec<Walker>),
    Ripple(&'a mut Vec<Ripple>),
    /// `true` while the next strobe tick will expand.
    Strobe(&'a mut bool),
}

impl Default for PatternState {
    fn default() -> Self {
        Self {
            walkers: Vec::new(),
            ripples: Vec::new(),
            strobe_expanding: true,
        }
    }
}

impl PatternState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_mut(&mut self, pattern: Pattern) -> EntityState<'_> {
        match pattern {
            Pattern::Vein => EntityState::Vein(&mut self.walkers),
            Pattern::Ripple => EntityState::Ripple(&mut self.ripples),
            Pattern::Strobe => EntityState::Strobe(&mut self.strobe_expanding),
            _ => EntityState::Idle,
        }
    }

    /// Clears the entities of `pattern`. Returns `false` for stateless patterns.
    pub fn reset(&mut self, pattern: Pattern) -> bool {
        match self.view_mut(pattern) {
            EntityState::Vein(walkers) => walkers.clear(),
            EntityState::Ripple(ripples) => ripples.clear(),
            EntityState::Strobe(expanding) => *expanding = true,
            EntityState::Idle => return false,
        }
        debug!("reset {pattern} entities");
        true
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn strobe_expanding(&self) -> bool {
        self.strobe_expanding
    }
}
