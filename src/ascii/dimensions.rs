//! Output grid dimensions for aspect-ratio-correct rendering.

/// Default character cell correction.
/// Terminal characters are roughly twice as tall as wide, so the output
/// gets about half as many rows as a square pixel grid would.
pub const CELL_ASPECT: f32 = 0.5;

/// Largest accepted cell correction.
pub const MAX_CELL_ASPECT: f32 = 4.0;

/// Tallest output, in rows.
pub const MAX_HEIGHT: u32 = 2000;

/// Narrowest output, in columns.
pub const MIN_WIDTH: u32 = 8;

/// Widest output, in columns.
pub const MAX_WIDTH: u32 = 400;

/// Width used when none is requested and no display width is known.
pub const DEFAULT_WIDTH: u32 = 80;

/// Upper bound when fitting to a display, to keep huge terminals sane.
pub const FIT_MAX_WIDTH: u32 = 200;

/// Columns kept free at the right edge of a display to prevent wrapping.
const DISPLAY_MARGIN: u32 = 2;

/// Clamp a requested width into `[MIN_WIDTH, MAX_WIDTH]`.
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Keep a configured cell correction inside `(0, MAX_CELL_ASPECT]`.
///
/// Non-positive and non-finite values fall back to [`CELL_ASPECT`].
pub fn sanitize_cell_aspect(cell_aspect: f32) -> f32 {
    if cell_aspect.is_finite() && cell_aspect > 0.0 {
        cell_aspect.min(MAX_CELL_ASPECT)
    } else {
        CELL_ASPECT
    }
}

/// Number of output rows for an image rendered `width` columns wide.
///
/// `round(width * img_height / img_width * cell_aspect)`, clamped to
/// `[1, MAX_HEIGHT]`.
///
/// # Example
/// ```
/// use trashgang::ascii::{target_height, CELL_ASPECT};
/// assert_eq!(target_height(80, 100, 100, CELL_ASPECT), 40);
/// assert_eq!(target_height(80, 640, 480, CELL_ASPECT), 30);
/// ```
pub fn target_height(width: u32, img_width: u32, img_height: u32, cell_aspect: f32) -> u32 {
    if img_width == 0 || img_height == 0 {
        return 1;
    }

    let rows = width as f64 * img_height as f64 / img_width as f64 * cell_aspect as f64;
    if !rows.is_finite() {
        return 1;
    }
    rows.round().clamp(1.0, MAX_HEIGHT as f64) as u32
}

/// How wide the caller wants the rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthSpec {
    /// Nothing requested: follow the display when known, else [`DEFAULT_WIDTH`].
    #[default]
    Default,
    /// An explicit column count.
    Columns(u32),
    /// Fit the display width.
    Fit,
}

impl WidthSpec {
    /// Resolve to a column count for a display `display_width` columns wide
    /// (if the caller knows it).
    ///
    /// `Default` and `Fit` follow the display (capped at [`FIT_MAX_WIDTH`]).
    /// Any width is then kept [`DISPLAY_MARGIN`] columns inside the display,
    /// and the result always lies in `[MIN_WIDTH, MAX_WIDTH]`.
    pub fn resolve(self, display_width: Option<u32>) -> u32 {
        let display = display_width.filter(|&w| w > 0);

        let width = match (self, display) {
            (WidthSpec::Columns(n), _) => n,
            (WidthSpec::Default | WidthSpec::Fit, Some(d)) => d.min(FIT_MAX_WIDTH),
            (WidthSpec::Default | WidthSpec::Fit, None) => DEFAULT_WIDTH,
        };

        let width = match display {
            Some(d) => width.min(d.saturating_sub(DISPLAY_MARGIN).max(MIN_WIDTH)),
            None => width,
        };
        clamp_width(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_image_at_80_columns() {
        assert_eq!(target_height(80, 100, 100, CELL_ASPECT), 40);
    }

    #[test]
    fn test_height_rounds() {
        // 80 * 3 / 4 * 0.5 = 30
        assert_eq!(target_height(80, 400, 300, CELL_ASPECT), 30);
        // 9 * 1 / 1 * 0.5 = 4.5 -> 5
        assert_eq!(target_height(9, 10, 10, CELL_ASPECT), 5);
    }

    #[test]
    fn test_height_is_at_least_one() {
        assert_eq!(target_height(8, 10_000, 1, CELL_ASPECT), 1);
        assert_eq!(target_height(8, 0, 0, CELL_ASPECT), 1);
    }

    #[test]
    fn test_custom_cell_aspect() {
        assert_eq!(target_height(40, 100, 100, 1.0), 40);
    }

    #[test]
    fn test_height_is_capped() {
        assert_eq!(target_height(400, 1, 100_000, CELL_ASPECT), MAX_HEIGHT);
        assert_eq!(target_height(80, 100, 100, 1e6), MAX_HEIGHT);
    }

    #[test]
    fn test_sanitize_cell_aspect() {
        assert_eq!(sanitize_cell_aspect(0.5), 0.5);
        assert_eq!(sanitize_cell_aspect(1e6), MAX_CELL_ASPECT);
        assert_eq!(sanitize_cell_aspect(0.0), CELL_ASPECT);
        assert_eq!(sanitize_cell_aspect(-2.0), CELL_ASPECT);
        assert_eq!(sanitize_cell_aspect(f32::NAN), CELL_ASPECT);
        assert_eq!(sanitize_cell_aspect(f32::INFINITY), CELL_ASPECT);
    }

    #[test]
    fn test_clamp_width() {
        assert_eq!(clamp_width(1), 8);
        assert_eq!(clamp_width(80), 80);
        assert_eq!(clamp_width(1000), 400);
    }

    #[test]
    fn test_resolve_without_display() {
        assert_eq!(WidthSpec::Default.resolve(None), 80);
        assert_eq!(WidthSpec::Fit.resolve(None), 80);
        assert_eq!(WidthSpec::Columns(120).resolve(None), 120);
        assert_eq!(WidthSpec::Columns(3).resolve(None), 8);
        assert_eq!(WidthSpec::Columns(999).resolve(None), 400);
    }

    #[test]
    fn test_resolve_follows_display() {
        assert_eq!(WidthSpec::Default.resolve(Some(100)), 98);
        assert_eq!(WidthSpec::Fit.resolve(Some(300)), 200);
        assert_eq!(WidthSpec::Columns(150).resolve(Some(100)), 98);
        assert_eq!(WidthSpec::Columns(40).resolve(Some(100)), 40);
    }

    #[test]
    fn test_resolve_tiny_display() {
        assert_eq!(WidthSpec::Fit.resolve(Some(5)), 8);
        assert_eq!(WidthSpec::Columns(60).resolve(Some(5)), 8);
        assert_eq!(WidthSpec::Default.resolve(Some(0)), 80);
    }
}
