//! Character-art rasterizer.
//!
//! Turns a decoded image into a block of text suitable for a chat message:
//!
//! 1. **Dimensions** - output rows from the requested width, the image aspect
//!    ratio and the character cell aspect
//! 2. **Scaling** - bilinear resample to exactly one pixel per cell
//! 3. **Mapping** - alpha against black, Rec. 709 luminance, ramp lookup
//! 4. **Emission** - one character per cell, optionally with 24-bit color
//!
//! # Ramps
//!
//! Ramps are ordered darkest first. Presets are available via [`CharSet`]:
//! - `Standard` - 10-level ASCII density ramp (the default)
//! - `Blocks` - Unicode block characters
//! - `Minimal` - 4-level clean look

mod charset;
mod dimensions;
mod mapping;
mod raster;

pub use charset::{CharSet, Ramp, BLOCKS_RAMP, FALLBACK_RAMP, MINIMAL_RAMP, STANDARD_RAMP};
pub use dimensions::{
    clamp_width, sanitize_cell_aspect, target_height, WidthSpec, CELL_ASPECT, DEFAULT_WIDTH,
    FIT_MAX_WIDTH, MAX_CELL_ASPECT, MAX_HEIGHT, MAX_WIDTH, MIN_WIDTH,
};
pub use mapping::{luminance, map_pixel, ramp_index, unpremultiply, Cell, LUMA_MAX, LUMA_SCALE};
pub use raster::{
    rasterize, render_image, scale, sgr_color, strip_sgr, RasterOptions, TextBlock, SGR_RESET,
};
