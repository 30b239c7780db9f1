#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_filmstrip_to_png, render_grid_to_png, seeded_canvas, Palette,
    RenderConfig,
};
