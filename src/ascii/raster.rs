//! Scaling a raster to the character grid and emitting the text block.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use super::charset::Ramp;
use super::dimensions::{clamp_width, target_height, CELL_ASPECT};
use super::mapping::map_pixel;

/// Reset directive appended to every colorized row.
pub const SGR_RESET: &str = "\x1b[0m";

/// Options for turning a raster into text.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Output columns; clamped to `[MIN_WIDTH, MAX_WIDTH]`.
    pub width: u32,
    pub cell_aspect: f32,
    pub ramp: Ramp,
    pub colorize: bool,
    pub invert: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: super::DEFAULT_WIDTH,
            cell_aspect: CELL_ASPECT,
            ramp: Ramp::default(),
            colorize: false,
            invert: false,
        }
    }
}

/// A rendered text block and its grid size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub width: u32,
    pub height: u32,
}

/// 24-bit foreground color directive: `ESC[38;2;R;G;Bm`.
pub fn sgr_color(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

/// Bilinear resample of `image` to exactly `width` x `height`.
pub fn scale(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let rgba = image.to_rgba8();
    if rgba.dimensions() == (width, height) {
        return rgba;
    }
    image::imageops::resize(&rgba, width, height, FilterType::Triangle)
}

/// Render an already-scaled raster, one character per pixel.
///
/// Rows are newline-terminated. With `colorize`, every character is
/// preceded by a foreground directive and every row ends with
/// [`SGR_RESET`] before the newline.
pub fn rasterize(grid: &RgbaImage, ramp: &Ramp, colorize: bool, invert: bool) -> String {
    let (w, h) = grid.dimensions();
    if w == 0 || h == 0 {
        return String::new();
    }

    // Color directives are at most 19 bytes per cell.
    let per_cell = if colorize { 23 } else { 4 };
    let mut out = String::with_capacity((w as usize * per_cell + 8) * h as usize);

    for row in grid.rows() {
        for pixel in row {
            let cell = map_pixel(pixel.0, ramp, invert);
            if colorize {
                let [r, g, b] = cell.rgb;
                out.push_str(&sgr_color(r, g, b));
            }
            out.push(cell.ch);
        }
        if colorize {
            out.push_str(SGR_RESET);
        }
        out.push('\n');
    }

    out
}

/// Scale `image` to the requested width and render it.
pub fn render_image(image: &DynamicImage, options: &RasterOptions) -> TextBlock {
    let width = clamp_width(options.width);
    let height = target_height(width, image.width(), image.height(), options.cell_aspect);

    let grid = scale(image, width, height);
    let text = rasterize(&grid, &options.ramp, options.colorize, options.invert);

    TextBlock {
        text,
        width,
        height,
    }
}

/// Remove `ESC[...m` directives, leaving only the visible characters.
pub fn strip_sgr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for d in chars.by_ref() {
                if d == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
