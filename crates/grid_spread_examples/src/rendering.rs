//! PNG output and shared setup for the example binaries.
use std::path::Path;

use grid_spread::grid::{Color, Grid, EMPTY};
use image::{imageops, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber honoring `RUST_LOG` (default `info`). Safe to call twice.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Maps palette indices to RGB. Index `0` is never looked up; it draws the background.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(vec![
            [236, 94, 76],
            [246, 180, 67],
            [244, 232, 142],
            [118, 196, 122],
            [70, 160, 190],
            [88, 104, 196],
            [160, 96, 190],
            [230, 120, 170],
            [240, 240, 240],
            [120, 120, 120],
        ])
    }
}

impl Palette {
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        Self { colors }
    }

    /// RGB for a non-empty color index, cycling through the palette.
    pub fn rgb(&self, color: Color) -> [u8; 3] {
        if self.colors.is_empty() {
            return [255, 255, 255];
        }
        self.colors[(color as usize - 1) % self.colors.len()]
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Edge length of one grid cell in pixels.
    pub cell_size: u32,
    pub background: [u8; 3],
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 8,
            background: [22, 22, 26],
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.max(1),
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

fn render_grid(grid: &Grid, rc: &RenderConfig) -> RgbImage {
    let cs = rc.cell_size;
    let mut img = RgbImage::from_pixel(
        (grid.cols() as u32 * cs).max(1),
        (grid.rows() as u32 * cs).max(1),
        Rgb(rc.background),
    );
    for (row, col, color) in grid.colored_cells() {
        debug_assert_ne!(color, EMPTY);
        let px = Rgb(rc.palette.rgb(color));
        for dy in 0..cs {
            for dx in 0..cs {
                img.put_pixel(col as u32 * cs + dx, row as u32 * cs + dy, px);
            }
        }
    }
    img
}

/// Writes one grid as a PNG.
pub fn render_grid_to_png(
    grid: &Grid,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    render_grid(grid, rc).save(path)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Writes several same-sized grids side by side, separated by `gap` background pixels.
pub fn render_filmstrip_to_png(
    frames: &[Grid],
    rc: &RenderConfig,
    gap: u32,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let Some(first) = frames.first() else {
        anyhow::bail!("filmstrip needs at least one frame");
    };
    let frame_w = first.cols() as u32 * rc.cell_size;
    let frame_h = first.rows() as u32 * rc.cell_size;
    let n = frames.len() as u32;
    let mut strip = RgbImage::from_pixel(
        (n * frame_w + (n + 1) * gap).max(1),
        (frame_h + 2 * gap).max(1),
        Rgb(rc.background),
    );
    for (i, frame) in frames.iter().enumerate() {
        anyhow::ensure!(
            frame.rows() == first.rows() && frame.cols() == first.cols(),
            "frame {i} is {}x{}, expected {}x{}",
            frame.rows(),
            frame.cols(),
            first.rows(),
            first.cols()
        );
        let x = gap + i as u32 * (frame_w + gap);
        imageops::replace(&mut strip, &render_grid(frame, rc), x as i64, gap as i64);
    }
    let path = path.as_ref();
    strip.save(path)?;
    tracing::info!("wrote {} ({} frames)", path.display(), frames.len());
    Ok(())
}

/// A grid with a few filled blobs of colors `1..=colors`, reproducible from `seed`.
pub fn seeded_canvas(rows: usize, cols: usize, colors: Color, seed: u64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(rows, cols);
    if grid.is_empty() || colors == 0 {
        return grid;
    }
    let blobs = 3 + (rng.next_u32() % 4) as usize;
    for b in 0..blobs {
        let color = 1 + (b as Color % colors);
        let cr = (rng.next_u32() as usize) % rows;
        let cc = (rng.next_u32() as usize) % cols;
        let radius = 2 + (rng.next_u32() % 4) as isize;
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr * dr + dc * dc > radius * radius {
                    continue;
                }
                if let Some((r, c)) = grid.offset(cr, cc, dr, dc) {
                    grid.set(r, c, color);
                }
            }
        }
    }
    grid
}
