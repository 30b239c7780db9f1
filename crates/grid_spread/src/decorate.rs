//! Stochastic decorators driven by the `dots` and `shapes` channels.
//!
//! Both take the allowed generative colors and overwrite whatever lies underneath.
//! An empty color list makes them pass-through.
use rand::Rng;
use tracing::warn;

use crate::events::{EventSink, SpreadEvent};
use crate::grid::{Color, Grid};
use crate::pattern::{chance, rand_index};
use crate::schedule::ChannelKind;

/// Fewest and most dots placed per call.
pub const DOTS_MIN: usize = 5;
pub const DOTS_MAX: usize = 10;

/// Fewest and most shapes placed per call.
pub const SHAPES_MIN: usize = 1;
pub const SHAPES_MAX: usize = 2;

/// Side length range of a rectangle.
pub const RECT_SIDE_MIN: usize = 3;
pub const RECT_SIDE_MAX: usize = 8;

/// Length range of a line.
pub const LINE_MIN: usize = 5;
pub const LINE_MAX: usize = 14;

/// Direction a line runs from its start cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOrientation {
    Horizontal,
    Vertical,
    /// Down and to the right.
    Diagonal,
    /// Down and to the left.
    AntiDiagonal,
}

impl LineOrientation {
    pub const ALL: [LineOrientation; 4] = [
        LineOrientation::Horizontal,
        LineOrientation::Vertical,
        LineOrientation::Diagonal,
        LineOrientation::AntiDiagonal,
    ];

    fn step(self) -> (isize, isize) {
        match self {
            LineOrientation::Horizontal => (0, 1),
            LineOrientation::Vertical => (1, 0),
            LineOrientation::Diagonal => (1, 1),
            LineOrientation::AntiDiagonal => (1, -1),
        }
    }
}

/// A single placed shape, clipped to the grid when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Rect {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
    Line {
        row: usize,
        col: usize,
        len: usize,
        orientation: LineOrientation,
    },
}

impl Shape {
    /// Fills the shape's cells with `color`, ignoring any part past the grid edge.
    pub fn draw(&self, grid: &mut Grid, color: Color) {
        match *self {
            Shape::Rect {
                row,
                col,
                height,
                width,
            } => {
                let row_end = (row + height).min(grid.rows());
                let col_end = (col + width).min(grid.cols());
                for r in row..row_end {
                    for c in col..col_end {
                        grid.set(r, c, color);
                    }
                }
            }
            Shape::Line {
                row,
                col,
                len,
                orientation,
            } => {
                let (dr, dc) = orientation.step();
                for i in 0..len as isize {
                    match grid.offset(row, col, dr * i, dc * i) {
                        Some((r, c)) => grid.set(r, c, color),
                        None => break,
                    }
                }
            }
        }
    }
}

/// Places 5 to 10 single-cell dots of random allowed colors at random positions.
pub fn add_random_dots(grid: &Grid, allowed: &[Color], rng: &mut dyn Rng) -> Grid {
    add_random_dots_with_events(grid, allowed, rng, &mut ())
}

/// Like [`add_random_dots`], reporting an empty palette to `sink`.
pub fn add_random_dots_with_events(
    grid: &Grid,
    allowed: &[Color],
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Grid {
    let mut out = grid.clone();
    if allowed.is_empty() {
        no_palette(ChannelKind::Dots, sink);
        return out;
    }
    if grid.is_empty() {
        return out;
    }
    let count = uniform_inclusive(rng, DOTS_MIN, DOTS_MAX);
    for _ in 0..count {
        let row = rand_index(rng, grid.rows());
        let col = rand_index(rng, grid.cols());
        let color = allowed[rand_index(rng, allowed.len())];
        out.set(row, col, color);
    }
    out
}

/// Places one or two filled rectangles or straight lines, each in one random allowed color.
pub fn add_random_shapes(grid: &Grid, allowed: &[Color], rng: &mut dyn Rng) -> Grid {
    add_random_shapes_with_events(grid, allowed, rng, &mut ())
}

/// Like [`add_random_shapes`], reporting an empty palette to `sink`.
pub fn add_random_shapes_with_events(
    grid: &Grid,
    allowed: &[Color],
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> Grid {
    let mut out = grid.clone();
    if allowed.is_empty() {
        no_palette(ChannelKind::Shapes, sink);
        return out;
    }
    if grid.is_empty() {
        return out;
    }
    let count = uniform_inclusive(rng, SHAPES_MIN, SHAPES_MAX);
    for _ in 0..count {
        let shape = random_shape(grid, rng);
        let color = allowed[rand_index(rng, allowed.len())];
        shape.draw(&mut out, color);
    }
    out
}

fn no_palette(channel: ChannelKind, sink: &mut dyn EventSink) {
    let message = "no allowed colors, grid left unchanged".to_string();
    warn!("{channel}: {message}");
    sink.send(SpreadEvent::Warning { channel, message });
}

/// Picks a rectangle or a line (even odds) anchored at a uniformly random cell.
/// Lines take one of the four orientations uniformly.
pub fn random_shape(grid: &Grid, rng: &mut dyn Rng) -> Shape {
    let row = rand_index(rng, grid.rows());
    let col = rand_index(rng, grid.cols());
    if chance(rng, 0.5) {
        Shape::Rect {
            row,
            col,
            height: uniform_inclusive(rng, RECT_SIDE_MIN, RECT_SIDE_MAX),
            width: uniform_inclusive(rng, RECT_SIDE_MIN, RECT_SIDE_MAX),
        }
    } else {
        Shape::Line {
            row,
            col,
            len: uniform_inclusive(rng, LINE_MIN, LINE_MAX),
            orientation: LineOrientation::ALL[rand_index(rng, LineOrientation::ALL.len())],
        }
    }
}

fn uniform_inclusive(rng: &mut dyn Rng, lo: usize, hi: usize) -> usize {
    lo + rand_index(rng, hi - lo + 1)
}
