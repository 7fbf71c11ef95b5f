//! Pixel to character mapping.

use super::charset::Ramp;

/// Fixed-point scale of [`luminance`]; the Rec. 709 weights
/// 0.2126 / 0.7152 / 0.0722 become 2126 / 7152 / 722.
pub const LUMA_SCALE: u32 = 10_000;

/// Luminance of pure white, in [`LUMA_SCALE`] units.
pub const LUMA_MAX: u32 = 255 * LUMA_SCALE;

/// Scale color channels by alpha against a black background.
///
/// Fully transparent pixels come out black, so they render as the darkest
/// ramp character.
#[inline]
pub fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 3] {
    let scale = |c: u8| (c as u32 * a as u32 / 255) as u8;
    [scale(r), scale(g), scale(b)]
}

/// Perceptual brightness `0.2126 R + 0.7152 G + 0.0722 B`, in
/// [`LUMA_SCALE`] units (`0..=LUMA_MAX`).
///
/// Integer math keeps the extremes exact: white is exactly [`LUMA_MAX`].
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u32 {
    2126 * r as u32 + 7152 * g as u32 + 722 * b as u32
}

/// Ramp index for a scaled luminance on a ramp of `levels` characters.
///
/// `floor(lum * (levels - 1) / 255)` with `lum` in 0-255 terms, clamped to
/// `[0, levels - 1]`.
#[inline]
pub fn ramp_index(lum: u32, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    let max = (levels - 1) as u64;
    let idx = lum.min(LUMA_MAX) as u64 * max / LUMA_MAX as u64;
    idx as usize
}

/// One rendered cell: the character and the color it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub rgb: [u8; 3],
}

/// Map an RGBA pixel to a cell.
///
/// Dark pixels take the ramp's first characters, light pixels the last;
/// `invert` swaps that.
#[inline]
pub fn map_pixel(rgba: [u8; 4], ramp: &Ramp, invert: bool) -> Cell {
    let [r, g, b, a] = rgba;
    let rgb = unpremultiply(r, g, b, a);
    let mut lum = luminance(rgb[0], rgb[1], rgb[2]);
    if invert {
        lum = LUMA_MAX - lum;
    }
    Cell {
        ch: ramp.get(ramp_index(lum, ramp.len())),
        rgb,
    }
}
