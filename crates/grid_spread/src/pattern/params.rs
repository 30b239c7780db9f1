//! Parameter bag read by the pattern transforms.
//!
//! [`SpreadParams`] carries the shared knobs (spread probability, allowed generative
//! colors) plus one typed struct per pattern family. The scheduler owns one instance
//! and every transform reads it by reference at the start of a tick.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{Color, CARDINAL, MOORE};

/// Which neighborhood the random-walk spread chooses targets from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NeighborMode {
    /// All 8 surrounding cells.
    #[default]
    Moore,
    /// Only the 4 edge-sharing cells.
    Cardinal,
}

impl NeighborMode {
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            NeighborMode::Moore => &MOORE,
            NeighborMode::Cardinal => &CARDINAL,
        }
    }
}

/// One of the four axis directions a flow can move in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowDirection {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl FlowDirection {
    /// `(d_row, d_col)` of a single step.
    pub fn offset(self) -> (isize, isize) {
        match self {
            FlowDirection::Up => (-1, 0),
            FlowDirection::Down => (1, 0),
            FlowDirection::Left => (0, -1),
            FlowDirection::Right => (0, 1),
        }
    }
}

/// The eight named compass directions. North is row `-1`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction8 {
    North,
    NorthEast,
    #[default]
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::North,
        Direction8::NorthEast,
        Direction8::East,
        Direction8::SouthEast,
        Direction8::South,
        Direction8::SouthWest,
        Direction8::West,
        Direction8::NorthWest,
    ];

    /// `(d_row, d_col)` of a single step.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction8::North => (-1, 0),
            Direction8::NorthEast => (-1, 1),
            Direction8::East => (0, 1),
            Direction8::SouthEast => (1, 1),
            Direction8::South => (1, 0),
            Direction8::SouthWest => (1, -1),
            Direction8::West => (0, -1),
            Direction8::NorthWest => (-1, -1),
        }
    }
}

/// Birth/survival rule shared by `conway` and `tendrils`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeRule {
    /// Live-neighbor counts at which an empty cell is born.
    pub born: Vec<u8>,
    /// Live-neighbor counts at which a colored cell survives.
    pub survive: Vec<u8>,
}

impl LifeRule {
    pub fn new(born: impl Into<Vec<u8>>, survive: impl Into<Vec<u8>>) -> Self {
        Self {
            born: born.into(),
            survive: survive.into(),
        }
    }

    /// B3/S23.
    pub fn conway() -> Self {
        Self::new(vec![3], vec![2, 3])
    }

    /// Sparse branching growth: born next to exactly one cell, thin strands survive.
    pub fn tendrils() -> Self {
        Self::new(vec![1], vec![1, 2])
    }

    fn validate(&self, name: &str) -> Result<()> {
        if let Some(n) = self.born.iter().chain(&self.survive).find(|&&n| n > 8) {
            return Err(Error::InvalidConfig(format!(
                "{name}: neighbor count {n} is outside [0, 8]"
            )));
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CrystallizeParams {
    /// Neighbor occurrences of a single color needed to grow into an empty cell.
    pub threshold: u8,
}

impl Default for CrystallizeParams {
    fn default() -> Self {
        Self { threshold: 2 }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VeinParams {
    /// Probability that a walker steps toward the nearest colored cell.
    pub seek_strength: f32,
    /// Probability that a walker clones itself after moving.
    pub branch_chance: f32,
}

impl Default for VeinParams {
    fn default() -> Self {
        Self {
            seek_strength: 0.3,
            branch_chance: 0.05,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ErosionParams {
    /// Probability that a colored cell is considered for erasure.
    pub erosion_rate: f32,
    /// Empty-or-outside neighbors needed before a cell erodes.
    pub solidity: u8,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            erosion_rate: 0.3,
            solidity: 4,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RandomWalkParams {
    /// Neighbors painted per spreading cell.
    pub spread_count: u8,
    pub mode: NeighborMode,
}

impl Default for RandomWalkParams {
    fn default() -> Self {
        Self {
            spread_count: 1,
            mode: NeighborMode::Moore,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalParams {
    pub bias: Direction8,
    /// Probability that a spread target is forced to the bias cell.
    pub bias_strength: f32,
    pub spread_count: u8,
    pub mode: NeighborMode,
}

impl Default for DirectionalParams {
    fn default() -> Self {
        Self {
            bias: Direction8::South,
            bias_strength: 0.7,
            spread_count: 1,
            mode: NeighborMode::Moore,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ScrambleParams {
    /// Upper bound on color swaps per tick.
    pub swap_count: usize,
}

impl Default for ScrambleParams {
    fn default() -> Self {
        Self { swap_count: 10 }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct JitterParams {
    pub jitter_chance: f32,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self { jitter_chance: 0.2 }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct StrobeParams {
    /// Colored neighbors an empty cell needs to fill during the expand phase.
    pub expand_threshold: u8,
    /// Empty-or-outside neighbors a colored cell needs to clear during the contract phase.
    pub contract_threshold: u8,
}

impl Default for StrobeParams {
    fn default() -> Self {
        Self {
            expand_threshold: 2,
            contract_threshold: 5,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FlowParams {
    pub direction: FlowDirection,
    pub flow_chance: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            direction: FlowDirection::Down,
            flow_chance: 0.5,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PulseParams {
    /// Travel direction; decides which edge or corner is swept first.
    pub direction: Direction8,
    /// Paint over already-colored neighbors instead of empty ones only.
    pub overtakes: bool,
    /// Tick rate of the spread channel while `pulse` is active, in ticks per second.
    pub speed: f64,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            direction: Direction8::East,
            overtakes: false,
            speed: 4.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VortexParams {
    pub vortex_count: usize,
}

impl Default for VortexParams {
    fn default() -> Self {
        Self { vortex_count: 5 }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RippleParams {
    /// Per colored cell, per tick probability of emitting a new ripple.
    pub ripple_chance: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            ripple_chance: 0.002,
        }
    }
}

/// Every knob any pattern reads.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct SpreadParams {
    /// Global per-cell spread probability used by `randomWalk` and `directional`.
    pub spread_probability: f32,
    /// Colors patterns and decorators may introduce when creating new cells.
    pub allowed_colors: Vec<Color>,
    pub conway: LifeRule,
    pub tendrils: LifeRule,
    pub crystallize: CrystallizeParams,
    pub vein: VeinParams,
    pub erosion: ErosionParams,
    pub random_walk: RandomWalkParams,
    pub directional: DirectionalParams,
    pub scramble: ScrambleParams,
    pub jitter: JitterParams,
    pub strobe: StrobeParams,
    pub flow: FlowParams,
    pub pulse: PulseParams,
    pub vortex: VortexParams,
    pub ripple: RippleParams,
}

impl Default for SpreadParams {
    fn default() -> Self {
        Self {
            spread_probability: 0.2,
            allowed_colors: vec![1],
            conway: LifeRule::conway(),
            tendrils: LifeRule::tendrils(),
            crystallize: CrystallizeParams::default(),
            vein: VeinParams::default(),
            erosion: ErosionParams::default(),
            random_walk: RandomWalkParams::default(),
            directional: DirectionalParams::default(),
            scramble: ScrambleParams::default(),
            jitter: JitterParams::default(),
            strobe: StrobeParams::default(),
            flow: FlowParams::default(),
            pulse: PulseParams::default(),
            vortex: VortexParams::default(),
            ripple: RippleParams::default(),
        }
    }
}

impl SpreadParams {
    pub fn with_spread_probability(mut self, probability: f32) -> Self {
        self.spread_probability = probability;
        self
    }

    pub fn with_allowed_colors(mut self, colors: impl Into<Vec<Color>>) -> Self {
        self.allowed_colors = colors.into();
        self
    }

    /// Color used when a pattern creates a cell with no colored neighbor to copy from.
    pub fn fallback_color(&self) -> Color {
        self.allowed_colors.first().copied().unwrap_or(1)
    }

    /// Validates ranges, returning an error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        check_probability("spread_probability", self.spread_probability)?;
        self.conway.validate("conway")?;
        self.tendrils.validate("tendrils")?;
        check_threshold("crystallize.threshold", self.crystallize.threshold)?;
        check_probability("vein.seek_strength", self.vein.seek_strength)?;
        check_probability("vein.branch_chance", self.vein.branch_chance)?;
        check_probability("erosion.erosion_rate", self.erosion.erosion_rate)?;
        check_threshold("erosion.solidity", self.erosion.solidity)?;
        check_threshold("random_walk.spread_count", self.random_walk.spread_count)?;
        check_probability("directional.bias_strength", self.directional.bias_strength)?;
        check_threshold("directional.spread_count", self.directional.spread_count)?;
        check_probability("jitter.jitter_chance", self.jitter.jitter_chance)?;
        check_threshold("strobe.expand_threshold", self.strobe.expand_threshold)?;
        check_threshold("strobe.contract_threshold", self.strobe.contract_threshold)?;
        check_probability("flow.flow_chance", self.flow.flow_chance)?;
        check_rate("pulse.speed", self.pulse.speed)?;
        check_probability("ripple.ripple_chance", self.ripple.ripple_chance)?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_threshold(name: &str, value: u8) -> Result<()> {
    if !(1..=8).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be in [1, 8], got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn check_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "{name} must be a positive finite rate, got {value}"
        )));
    }
    Ok(())
}
